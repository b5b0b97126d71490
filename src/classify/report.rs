//! Evaluation report: accuracy plus per-category precision, recall, and
//! F1 over a set of (truth, prediction) pairs.

use crate::types::Category;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMetrics {
    pub category: Category,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub total: usize,
    pub per_category: Vec<CategoryMetrics>,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl ClassificationReport {
    /// Build a report from `(truth, predicted)` pairs.
    pub fn from_pairs(pairs: &[(Category, Category)]) -> Self {
        let correct = pairs.iter().filter(|(t, p)| t == p).count();

        let per_category = Category::ALL
            .iter()
            .map(|&category| {
                let tp = pairs
                    .iter()
                    .filter(|&&(t, p)| t == category && p == category)
                    .count();
                let predicted = pairs.iter().filter(|&&(_, p)| p == category).count();
                let support = pairs.iter().filter(|&&(t, _)| t == category).count();
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                CategoryMetrics {
                    category,
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect();

        Self {
            accuracy: ratio(correct, pairs.len()),
            total: pairs.len(),
            per_category,
        }
    }
}

impl std::fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:<16} {:>9} {:>9} {:>9} {:>9}",
            "category", "precision", "recall", "f1", "support"
        )?;
        for m in &self.per_category {
            writeln!(
                f,
                "{:<16} {:>9.3} {:>9.3} {:>9.3} {:>9}",
                m.category.as_str(),
                m.precision,
                m.recall,
                m.f1,
                m.support
            )?;
        }
        writeln!(f)?;
        write!(
            f,
            "accuracy: {:.3} over {} documents",
            self.accuracy, self.total
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn metrics(report: &ClassificationReport, category: Category) -> &CategoryMetrics {
        report
            .per_category
            .iter()
            .find(|m| m.category == category)
            .unwrap()
    }

    #[test]
    fn perfect_predictions() {
        let pairs = vec![
            (Category::Admin, Category::Admin),
            (Category::Legal, Category::Legal),
        ];
        let report = ClassificationReport::from_pairs(&pairs);

        assert!((report.accuracy - 1.0).abs() < EPS);
        let admin = metrics(&report, Category::Admin);
        assert!((admin.precision - 1.0).abs() < EPS);
        assert!((admin.recall - 1.0).abs() < EPS);
        assert!((admin.f1 - 1.0).abs() < EPS);
        assert_eq!(admin.support, 1);
    }

    #[test]
    fn mixed_predictions() {
        // 2 admin docs: one correct, one predicted legal.
        // 1 legal doc: predicted legal.
        let pairs = vec![
            (Category::Admin, Category::Admin),
            (Category::Admin, Category::Legal),
            (Category::Legal, Category::Legal),
        ];
        let report = ClassificationReport::from_pairs(&pairs);

        assert!((report.accuracy - 2.0 / 3.0).abs() < EPS);
        let admin = metrics(&report, Category::Admin);
        assert!((admin.precision - 1.0).abs() < EPS);
        assert!((admin.recall - 0.5).abs() < EPS);
        let legal = metrics(&report, Category::Legal);
        assert!((legal.precision - 0.5).abs() < EPS);
        assert!((legal.recall - 1.0).abs() < EPS);
    }

    #[test]
    fn absent_category_scores_zero_without_panicking() {
        let pairs = vec![(Category::Admin, Category::Admin)];
        let report = ClassificationReport::from_pairs(&pairs);

        let health = metrics(&report, Category::Health);
        assert_eq!(health.support, 0);
        assert!(health.precision.abs() < EPS);
        assert!(health.recall.abs() < EPS);
        assert!(health.f1.abs() < EPS);
    }

    #[test]
    fn empty_pair_list() {
        let report = ClassificationReport::from_pairs(&[]);
        assert_eq!(report.total, 0);
        assert!(report.accuracy.abs() < EPS);
    }

    #[test]
    fn display_renders_every_category() {
        let report = ClassificationReport::from_pairs(&[(Category::Admin, Category::Admin)]);
        let text = report.to_string();
        for category in Category::ALL {
            assert!(text.contains(category.as_str()));
        }
        assert!(text.contains("accuracy"));
    }
}
