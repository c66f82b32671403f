use crate::grading::scheme::{GradeScheme, LinearScheme};
use crate::grading::types::{ComponentContribution, WeightedTotal};
use crate::roster::AssessmentComponent;

/// Reduces a roster to its weighted total and linear point grade.
///
/// Ungraded components are skipped, not counted as zero. The weight sum is
/// not checked; a roster whose weights miss 100 still gets a direct weighted
/// sum. Only the point grade is clamped.
pub fn compute_total(components: &[AssessmentComponent]) -> WeightedTotal {
    compute_total_with(components, &LinearScheme)
}

/// Same as [`compute_total`], with the point grade taken from `scheme`.
pub fn compute_total_with(
    components: &[AssessmentComponent],
    scheme: &dyn GradeScheme,
) -> WeightedTotal {
    let mut total_score = 0.0;
    let mut graded_weight = 0.0;

    for component in components {
        if let Some(points) = component.contribution() {
            total_score += points;
            graded_weight += component.weight_percent;
        }
    }

    WeightedTotal {
        total_score,
        point_grade: scheme.point_grade(total_score),
        graded_weight,
    }
}

/// Per-component weighted scores, in roster order.
pub fn breakdown(components: &[AssessmentComponent]) -> Vec<ComponentContribution> {
    components
        .iter()
        .map(|c| ComponentContribution {
            name: c.name.clone(),
            weight_percent: c.weight_percent,
            score: c.score,
            weighted_score: c.contribution(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cs101() -> Vec<AssessmentComponent> {
        vec![
            AssessmentComponent::graded("Midterm Exam", 30.0, 85.0),
            AssessmentComponent::graded("Final Exam", 40.0, 88.0),
            AssessmentComponent::graded("Assignments", 20.0, 92.0),
            AssessmentComponent::graded("Quizzes", 10.0, 78.0),
        ]
    }

    #[test]
    fn test_full_completion() {
        let total = compute_total(&cs101());
        assert!((total.total_score - 86.5).abs() < 1e-9);
        assert!((total.point_grade - 8.65).abs() < 1e-9);
        assert!((total.graded_weight - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_ungraded_components_are_skipped() {
        let components = vec![
            AssessmentComponent::graded("Midterm", 40.0, 50.0),
            AssessmentComponent::ungraded("Final", 60.0),
        ];
        let total = compute_total(&components);
        assert_eq!(total.total_score, 20.0);
        assert_eq!(total.point_grade, 2.0);
        assert_eq!(total.graded_weight, 40.0);
    }

    #[test]
    fn test_graded_zero_counts_as_graded() {
        let components = vec![
            AssessmentComponent::graded("Midterm", 40.0, 0.0),
            AssessmentComponent::ungraded("Final", 60.0),
        ];
        let total = compute_total(&components);
        assert_eq!(total.total_score, 0.0);
        assert_eq!(total.graded_weight, 40.0);
    }

    #[test]
    fn test_all_ungraded() {
        let components = vec![
            AssessmentComponent::ungraded("Midterm", 50.0),
            AssessmentComponent::ungraded("Final", 50.0),
        ];
        let total = compute_total(&components);
        assert_eq!(total.total_score, 0.0);
        assert_eq!(total.point_grade, 0.0);
        assert_eq!(total.graded_weight, 0.0);
    }

    #[test]
    fn test_empty_roster() {
        assert_eq!(compute_total(&[]).total_score, 0.0);
    }

    #[test]
    fn test_bad_weight_sum_is_still_a_direct_sum() {
        let components = vec![
            AssessmentComponent::graded("Midterm", 50.0, 80.0),
            AssessmentComponent::graded("Final", 30.0, 90.0),
        ];
        let total = compute_total(&components);
        assert!((total.total_score - 67.0).abs() < 1e-9);
        assert!((total.point_grade - 6.7).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_scores_only_clamp_the_point_grade() {
        let components = vec![AssessmentComponent::graded("Bonus", 100.0, 130.0)];
        let total = compute_total(&components);
        assert_eq!(total.total_score, 130.0);
        assert_eq!(total.point_grade, 10.0);
    }

    #[test]
    fn test_idempotent() {
        let roster = cs101();
        let first = compute_total(&roster);
        let second = compute_total(&roster);
        assert_eq!(first.total_score.to_bits(), second.total_score.to_bits());
        assert_eq!(first.point_grade.to_bits(), second.point_grade.to_bits());
        assert_eq!(roster, cs101());
    }

    #[test]
    fn test_breakdown() {
        let components = vec![
            AssessmentComponent::graded("Midterm", 30.0, 85.0),
            AssessmentComponent::ungraded("Final", 70.0),
        ];
        let rows = breakdown(&components);
        assert_eq!(rows.len(), 2);
        assert!((rows[0].weighted_score.unwrap() - 25.5).abs() < 1e-9);
        assert_eq!(rows[1].weighted_score, None);
        assert_eq!(rows[1].name, "Final");
    }
}
