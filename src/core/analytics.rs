//! Aggregate statistics over a user's history

use std::collections::BTreeMap;

use crate::types::{Bias, BiasDistribution, HistoryItem, MonthlyTrend, UserAnalytics};

/// Total, per-label distribution and per-month trends (ascending)
pub fn summarize_history(items: &[HistoryItem]) -> UserAnalytics {
    let mut distribution = BiasDistribution::default();
    // month -> (count, score sum)
    let mut months: BTreeMap<String, (usize, i64)> = BTreeMap::new();

    for item in items {
        match item.analysis.bias {
            Bias::Left => distribution.left += 1,
            Bias::Right => distribution.right += 1,
            Bias::Neutral => distribution.neutral += 1,
        }
        let month = item.analysis.timestamp.format("%Y-%m").to_string();
        let entry = months.entry(month).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += item.analysis.bias_score as i64;
    }

    let monthly_trends = months
        .into_iter()
        .map(|(month, (count, sum))| MonthlyTrend {
            month,
            count,
            avg_bias_score: round_tenth(sum as f64 / count as f64),
        })
        .collect();

    UserAnalytics {
        total_analyses: items.len(),
        bias_distribution: distribution,
        monthly_trends,
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
