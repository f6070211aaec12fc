//! Cell-level coercion. Nothing here fails: anything that does not parse
//! becomes `None` and is left for grouping or joining to drop.

/// Destatis marks "no data" with a single hyphen.
pub const NO_DATA_MARKER: &str = "-";

/// 解析年份：只保留第一段，例如 `2019-01` → 2019
pub fn parse_year(raw: Option<&str>) -> Option<i32> {
    let raw = raw?.trim();
    let leading = raw.split('-').next()?.trim();
    if leading.is_empty() {
        return None;
    }

    let year = match leading.parse::<i32>() {
        Ok(year) => year,
        Err(_) => {
            // 已是數值格式，例如 "2019.0"
            let value = leading.parse::<f64>().ok()?;
            if !value.is_finite() || value.fract() != 0.0 {
                return None;
            }
            value as i32
        }
    };

    (1000..=9999).contains(&year).then_some(year)
}

pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() || raw == NO_DATA_MARKER {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}
