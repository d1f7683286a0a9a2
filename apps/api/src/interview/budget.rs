//! Category Budget Tracker: per-category question counts against configured quotas.

use crate::interview::models::InterviewState;

/// What a single budget advance did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetOutcome {
    /// The category charged for this answer, if any.
    pub charged_category: Option<String>,
    /// Set when the charge filled the category's quota.
    pub completed_category: Option<String>,
}

/// Charges one answered question to the current category.
///
/// Callers invoke this only for genuine answers. With no current category
/// (every quota exhausted) this is a no-op. Counts are never decremented.
pub fn advance(state: &mut InterviewState) -> BudgetOutcome {
    let Some(category) = state.current_category.clone() else {
        return BudgetOutcome::default();
    };

    let max = state.max_for(&category);
    let asked = state
        .questions_asked_by_category
        .entry(category.clone())
        .or_insert(0);
    *asked += 1;
    let asked = *asked;

    state.actual_questions_asked += 1;
    state.current_question_index = state.actual_questions_asked;

    let mut outcome = BudgetOutcome {
        charged_category: Some(category.clone()),
        completed_category: None,
    };

    if asked >= max {
        if !state.completed_categories.contains(&category) {
            state.completed_categories.push(category.clone());
        }
        state.current_category = next_pending_category(state);
        outcome.completed_category = Some(category);
    }

    outcome
}

/// First category, in configured order, that is not yet complete.
pub fn next_pending_category(state: &InterviewState) -> Option<String> {
    state
        .category_order
        .iter()
        .find(|c| !state.completed_categories.contains(c))
        .cloned()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::interview::models::CategoryConfig;

    fn state(configs: &[(&str, u32)], total: u32) -> InterviewState {
        let configs: Vec<CategoryConfig> = configs
            .iter()
            .map(|(t, n)| CategoryConfig {
                category_type: t.to_string(),
                number_of_questions: *n,
            })
            .collect();
        let now = Utc::now();
        InterviewState::new(&configs, total, now, now)
    }

    #[test]
    fn test_advance_charges_current_category() {
        let mut s = state(&[("technical", 2)], 2);
        let outcome = advance(&mut s);
        assert_eq!(outcome.charged_category.as_deref(), Some("technical"));
        assert_eq!(outcome.completed_category, None);
        assert_eq!(s.asked_in("technical"), 1);
        assert_eq!(s.actual_questions_asked, 1);
        assert_eq!(s.current_category.as_deref(), Some("technical"));
    }

    #[test]
    fn test_filling_quota_completes_category_and_moves_on() {
        let mut s = state(&[("technical", 1), ("behavioral", 2)], 3);
        let outcome = advance(&mut s);
        assert_eq!(outcome.completed_category.as_deref(), Some("technical"));
        assert_eq!(s.completed_categories, vec!["technical"]);
        assert_eq!(s.current_category.as_deref(), Some("behavioral"));
    }

    #[test]
    fn test_last_category_leaves_current_unset() {
        let mut s = state(&[("technical", 2)], 2);
        advance(&mut s);
        advance(&mut s);
        assert_eq!(s.completed_categories, vec!["technical"]);
        assert!(s.current_category.is_none());
        assert!(s.all_categories_complete());
    }

    #[test]
    fn test_exhausted_budget_is_a_no_op() {
        let mut s = state(&[("technical", 1)], 1);
        advance(&mut s);
        let before = s.clone();
        let outcome = advance(&mut s);
        assert_eq!(outcome, BudgetOutcome::default());
        assert_eq!(s, before);
    }

    /// Counts never exceed quotas and always sum to the total asked.
    #[test]
    fn test_budget_monotonicity_over_long_sequence() {
        let mut s = state(&[("technical", 3), ("behavioral", 2), ("situational", 1)], 6);
        for _ in 0..20 {
            advance(&mut s);
            for (category, asked) in &s.questions_asked_by_category {
                assert!(
                    *asked <= s.max_for(category),
                    "{category} exceeded its quota"
                );
            }
            let sum: u32 = s.questions_asked_by_category.values().sum();
            assert_eq!(sum, s.actual_questions_asked);
        }
        assert_eq!(s.actual_questions_asked, 6);
        assert_eq!(
            s.completed_categories,
            vec!["technical", "behavioral", "situational"]
        );
    }

    #[test]
    fn test_completed_category_is_never_listed_twice() {
        let mut s = state(&[("technical", 1), ("behavioral", 1)], 2);
        s.completed_categories.push("behavioral".to_string());
        advance(&mut s);
        assert_eq!(s.completed_categories, vec!["behavioral", "technical"]);
        assert!(s.current_category.is_none());
    }
}
