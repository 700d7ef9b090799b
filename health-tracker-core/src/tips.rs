use std::fmt::Display;

/// A group of health tips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipCategory {
    General,
    Nutrition,
    Exercise,
    Weight,
    BloodPressure,
    Steps,
}

impl TipCategory {
    /// Categories tied to a recorded metric
    pub const METRICS: [TipCategory; 3] = [Self::Weight, Self::BloodPressure, Self::Steps];

    /// Returns the tips of this category, in display order
    pub fn tips(&self) -> &'static [&'static str] {
        match self {
            Self::General => &[
                "Stay hydrated by drinking at least 8 glasses of water daily.",
                "Aim for 7-9 hours of sleep each night.",
                "Practice good posture throughout the day.",
                "Take regular breaks from screen time.",
                "Stay socially connected with friends and family.",
            ],
            Self::Nutrition => &[
                "Include a variety of fruits and vegetables in your diet.",
                "Choose whole grains over refined grains.",
                "Limit processed foods and added sugars.",
                "Eat protein-rich foods with each meal.",
                "Practice mindful eating.",
                "Plan your meals ahead.",
                "Include healthy fats in your diet, such as those from avocados, nuts, seeds, and olive oil.",
            ],
            Self::Exercise => &[
                "Aim for 30 minutes of moderate exercise daily.",
                "Include both cardio and strength training.",
                "Take regular walking breaks.",
                "Try different types of physical activities.",
                "Start with gentle exercises if you're new to working out.",
                "Remember to stretch before and after exercise.",
            ],
            Self::Weight => &[
                "Maintain a healthy weight by balancing your calorie intake and expenditure.",
                "If you're overweight, aim for gradual weight loss with a balanced diet and exercise.",
            ],
            Self::BloodPressure => &[
                "Monitor your blood pressure regularly and aim for a healthy range.",
                "If you have high blood pressure, reduce salt intake and stay physically active.",
            ],
            Self::Steps => &[
                "Aim for at least 10,000 steps daily to maintain a healthy lifestyle.",
                "Take breaks during long periods of sitting to improve circulation.",
            ],
        }
    }
}

impl Display for TipCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::General => "General",
            Self::Nutrition => "Nutrition",
            Self::Exercise => "Exercise",
            Self::Weight => "Weight",
            Self::BloodPressure => "Blood pressure",
            Self::Steps => "Steps",
        };

        f.write_str(name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_category_has_tips() {
        for category in [TipCategory::General, TipCategory::Nutrition, TipCategory::Exercise]
            .into_iter()
            .chain(TipCategory::METRICS)
        {
            assert!(!category.tips().is_empty(), "{category} has no tips");
        }
    }

    #[test]
    fn nutrition_tips_are_separate() {
        let tips = TipCategory::Nutrition.tips();

        assert_eq!(tips.len(), 7);
        assert_eq!(tips[5], "Plan your meals ahead.");
    }
}
