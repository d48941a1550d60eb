//! Bedside calculations offered on the `/calcoli` page.

/// Body mass index rounded to one decimal; `None` for non-positive or non-finite input.
pub fn bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if !is_positive(weight_kg) || !is_positive(height_cm) {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(round1(weight_kg / (height_m * height_m)))
}

/// WHO adult BMI bands.
pub fn bmi_category(bmi: f64) -> &'static str {
    match bmi {
        b if b < 18.5 => "Sottopeso",
        b if b < 25.0 => "Normopeso",
        b if b < 30.0 => "Sovrappeso",
        _ => "Obesità",
    }
}

/// Total dose in mg for a weight-based prescription.
pub fn weight_based_dose(mg_per_kg: f64, weight_kg: f64) -> Option<f64> {
    if !is_positive(mg_per_kg) || !is_positive(weight_kg) {
        return None;
    }
    Some(round1(mg_per_kg * weight_kg))
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmi_matches_the_roster_values() {
        assert_eq!(bmi(70.0, 175.0), Some(22.9));
        assert_eq!(bmi(82.5, 178.0), Some(26.0));
    }

    #[test]
    fn bmi_rejects_nonsense_input() {
        assert_eq!(bmi(0.0, 170.0), None);
        assert_eq!(bmi(70.0, -1.0), None);
        assert_eq!(bmi(f64::NAN, 170.0), None);
    }

    #[test]
    fn categories_follow_who_bands() {
        assert_eq!(bmi_category(17.0), "Sottopeso");
        assert_eq!(bmi_category(18.5), "Normopeso");
        assert_eq!(bmi_category(24.9), "Normopeso");
        assert_eq!(bmi_category(25.0), "Sovrappeso");
        assert_eq!(bmi_category(31.2), "Obesità");
    }

    #[test]
    fn dose_scales_with_weight() {
        assert_eq!(weight_based_dose(15.0, 20.0), Some(300.0));
        assert_eq!(weight_based_dose(0.0, 20.0), None);
        assert_eq!(weight_based_dose(10.0, 0.0), None);
    }
}
