use super::Role;
use crate::prediction::GradeSymbol;

pub const DEFAULT_CUSTOMER_MESSAGE: &str = "No additional information available.";
pub const DEFAULT_OWNER_RECOMMENDATION: &str = "🍕 No specific recommendations available.";
pub const DEFAULT_AUTHORITY_ACTION: &str = "🏛️ No specific actions available.";
pub const DEFAULT_BADGE_COLOR: &str = "#9E9E9E";
pub const DEFAULT_SUMMARY: &str = "No summary available.";

pub fn customer_message(grade: &str) -> &'static str {
    match GradeSymbol::from_symbol(grade) {
        Some(GradeSymbol::A) => "🟢 Excellent! This restaurant meets the highest standards of food safety and cleanliness. Customers can dine here with confidence.",
        Some(GradeSymbol::B) => "🟡 Good. The restaurant is fairly safe but improvements are needed in hygiene or food handling.",
        Some(GradeSymbol::C) => "🔴 Risky! This grade indicates significant health and safety concerns. Extra caution is advised when dining.",
        Some(GradeSymbol::N) => "⚪ Not Yet Graded. This restaurant hasn’t received a final grade yet.",
        Some(GradeSymbol::Z) => "⚪ Grade Pending. Awaiting inspection or administrative processing.",
        Some(GradeSymbol::P) => "⚪ Grade Pending Appeal. The grade may change after review.",
        None => DEFAULT_CUSTOMER_MESSAGE,
    }
}

pub fn owner_recommendation(grade: &str) -> &'static str {
    match GradeSymbol::from_symbol(grade) {
        Some(GradeSymbol::A) => "🍕 Keep up the great work! Continue regular cleaning, safe food storage, and staff hygiene training.",
        Some(GradeSymbol::B) => "🍕 Focus on improving food handling, staff training, and addressing minor violations before the next inspection.",
        Some(GradeSymbol::C) => "🍕 Immediate action needed: deep cleaning, pest control, and strict hygiene enforcement. Consider staff retraining.",
        Some(GradeSymbol::N) => "🍕 Prepare thoroughly for your first inspection: ensure cleanliness and compliance with safety standards.",
        Some(GradeSymbol::Z) => "🍕 Pending results: maintain high standards and prepare documentation in case of re-evaluation.",
        Some(GradeSymbol::P) => "🍕 Since this is under appeal, prepare strong evidence of compliance and corrective actions.",
        None => DEFAULT_OWNER_RECOMMENDATION,
    }
}

pub fn authority_action(grade: &str) -> &'static str {
    match GradeSymbol::from_symbol(grade) {
        Some(GradeSymbol::A) => "🏛️ Low priority. Routine inspection scheduling is sufficient.",
        Some(GradeSymbol::B) => "🏛️ Medium priority. Schedule a follow-up inspection to monitor compliance.",
        Some(GradeSymbol::C) => "🏛️ High priority. Immediate inspection and enforcement required to protect public health.",
        Some(GradeSymbol::N) => "🏛️ Not graded yet. Schedule initial inspection soon.",
        Some(GradeSymbol::Z) => "🏛️ Pending. Monitor status and ensure inspection is completed.",
        Some(GradeSymbol::P) => "🏛️ Under appeal. Review case details and verify compliance evidence.",
        None => DEFAULT_AUTHORITY_ACTION,
    }
}

pub fn badge_color(grade: &str) -> &'static str {
    match GradeSymbol::from_symbol(grade) {
        Some(GradeSymbol::A) => "#4CAF50",
        Some(GradeSymbol::B) => "#FFC107",
        Some(GradeSymbol::C) => "#F44336",
        Some(GradeSymbol::N | GradeSymbol::Z | GradeSymbol::P) | None => DEFAULT_BADGE_COLOR,
    }
}

pub fn summary(role: Role, grade: &str) -> &'static str {
    let Some(grade) = GradeSymbol::from_symbol(grade) else {
        return DEFAULT_SUMMARY;
    };

    match (role, grade) {
        (Role::Customer, GradeSymbol::A) => "✅ Safe choice! You can dine here with confidence.",
        (Role::Customer, GradeSymbol::B) => "⚠️ Some issues noted, but still acceptable.",
        (Role::Customer, GradeSymbol::C) => "❌ Risky! Consider alternatives for safety.",
        (Role::Customer, GradeSymbol::N) => "ℹ️ Not graded yet – no final evaluation available.",
        (Role::Customer, GradeSymbol::Z) => "⏳ Pending inspection – grade not final.",
        (Role::Customer, GradeSymbol::P) => "⏳ Under appeal – grade may change.",
        (Role::Owner, GradeSymbol::A) => "🍕 Fantastic! Your restaurant is in top condition.",
        (Role::Owner, GradeSymbol::B) => "🍕 Good, but improvements needed to reach Grade A.",
        (Role::Owner, GradeSymbol::C) => "🍕 Warning: Major improvements needed immediately!",
        (Role::Owner, GradeSymbol::N) => "🍕 First inspection pending – prepare thoroughly.",
        (Role::Owner, GradeSymbol::Z) => "🍕 Pending inspection – keep standards high.",
        (Role::Owner, GradeSymbol::P) => "🍕 Appeal ongoing – ensure compliance evidence is ready.",
        (Role::Authority, GradeSymbol::A) => "🏛️ Low priority: No urgent action needed.",
        (Role::Authority, GradeSymbol::B) => "🏛️ Medium priority: Monitor this establishment.",
        (Role::Authority, GradeSymbol::C) => "🏛️ High priority: Immediate inspection required!",
        (Role::Authority, GradeSymbol::N) => "🏛️ Initial inspection required soon.",
        (Role::Authority, GradeSymbol::Z) => "🏛️ Pending inspection – monitor closely.",
        (Role::Authority, GradeSymbol::P) => "🏛️ Under appeal – review documentation.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNKNOWN: [&str; 5] = ["", "a", "Q", "AB", "Grade A"];

    #[test]
    fn known_grades_never_fall_back() {
        for grade in GradeSymbol::ordered() {
            let symbol = grade.as_str();
            assert_ne!(customer_message(symbol), DEFAULT_CUSTOMER_MESSAGE);
            assert_ne!(owner_recommendation(symbol), DEFAULT_OWNER_RECOMMENDATION);
            assert_ne!(authority_action(symbol), DEFAULT_AUTHORITY_ACTION);
            for role in Role::ordered() {
                assert_ne!(summary(role, symbol), DEFAULT_SUMMARY);
            }
        }
    }

    #[test]
    fn unknown_grades_get_defaults() {
        for symbol in UNKNOWN {
            assert_eq!(customer_message(symbol), DEFAULT_CUSTOMER_MESSAGE);
            assert_eq!(owner_recommendation(symbol), DEFAULT_OWNER_RECOMMENDATION);
            assert_eq!(authority_action(symbol), DEFAULT_AUTHORITY_ACTION);
            assert_eq!(badge_color(symbol), DEFAULT_BADGE_COLOR);
            for role in Role::ordered() {
                assert_eq!(summary(role, symbol), DEFAULT_SUMMARY);
            }
        }
    }

    #[test]
    fn badge_colors_follow_severity() {
        assert_eq!(badge_color("A"), "#4CAF50");
        assert_eq!(badge_color("B"), "#FFC107");
        assert_eq!(badge_color("C"), "#F44336");
        assert_eq!(badge_color("P"), "#9E9E9E");
    }

    #[test]
    fn role_tables_are_distinct() {
        for grade in GradeSymbol::ordered() {
            let symbol = grade.as_str();
            assert_ne!(customer_message(symbol), owner_recommendation(symbol));
            assert_ne!(owner_recommendation(symbol), authority_action(symbol));
            assert_ne!(summary(Role::Customer, symbol), summary(Role::Owner, symbol));
        }
    }
}
