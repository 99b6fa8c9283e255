//! Property tests for the analysis invariants.

use proptest::prelude::*;
use querylens_analysis::aggregation::{OrganizationAccumulator, TableAccumulator};
use querylens_analysis::{AnalyzedQuery, QueryAnalyzer, UsageAggregator};
use querylens_core::config::QueryLensConfig;
use querylens_core::types::collections::FxHashSet;

fn analyzer() -> QueryAnalyzer {
    QueryAnalyzer::new(&QueryLensConfig::default()).unwrap()
}

// ── Extraction bounds ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn table_count_matches_distinct_names_and_cap(text in "\\PC{0,300}") {
        let q = analyzer().analyze_text("ORG", &text);
        let distinct: FxHashSet<String> = q.canonical_table_names().into_iter().collect();
        prop_assert_eq!(q.table_used_num, distinct.len());
        prop_assert!(q.table_used_num <= 6);
        prop_assert_eq!(q.is_complete, q.table_used_num > 0);
    }

    #[test]
    fn text_without_dotted_names_is_incomplete(text in "[a-zA-Z0-9_ ,()*=<>'\\n-]{0,200}") {
        let q = analyzer().analyze_text("ORG", &text);
        prop_assert!(!q.is_complete);
        prop_assert_eq!(q.table_used_num, 0);
    }

    #[test]
    fn generated_gridiron_joins_respect_the_cap(
        names in prop::collection::vec("[a-z]{1,8}", 1..12)
    ) {
        let refs: Vec<String> = names.iter().map(|n| format!("s_ptc.ptc_{n}")).collect();
        let text = format!("SELECT * FROM {}", refs.join(" JOIN "));
        let q = analyzer().analyze_text("ORG", &text);

        let mut first_seen: Vec<&String> = Vec::new();
        for name in &names {
            if !first_seen.contains(&name) {
                first_seen.push(name);
            }
        }
        let expected: Vec<String> = first_seen.iter().take(6).map(|s| s.to_string()).collect();
        prop_assert_eq!(q.canonical_table_names(), expected);
        prop_assert_eq!(q.tables_truncated, first_seen.len() > 6);
    }
}

// ── Scoring ───────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn clause_order_does_not_change_score(
        clauses in Just(vec![
            "WHERE b = 1",
            "GROUP BY a",
            "HAVING SUM(c) > 2",
            "ORDER BY a",
            "LIMIT 5",
            "JOIN s_ptc.ptc_x x ON 1 = 1",
        ]).prop_shuffle()
    ) {
        let baseline = analyzer()
            .analyze_text("ORG", "SELECT a FROM s_ptc.ptc_t WHERE b = 1 GROUP BY a HAVING SUM(c) > 2 ORDER BY a LIMIT 5 JOIN s_ptc.ptc_x x ON 1 = 1");
        let shuffled = analyzer()
            .analyze_text("ORG", &format!("SELECT a FROM s_ptc.ptc_t {}", clauses.join(" ")));
        prop_assert_eq!(shuffled.complexity.score, baseline.complexity.score);
        prop_assert_eq!(shuffled.complexity.category, baseline.complexity.category);
    }

    #[test]
    fn analysis_is_idempotent(text in "\\PC{0,200}") {
        let analyzer = analyzer();
        prop_assert_eq!(analyzer.analyze_text("ORG", &text), analyzer.analyze_text("ORG", &text));
    }
}

// ── Aggregation ───────────────────────────────────────────────────────────

const ORGS: [&str; 3] = ["ARI", "ATL", "BAL"];
const TEXTS: [&str; 6] = [
    "SELECT * FROM AwsDataCatalog.a.games_vw",
    "SELECT id FROM s_ptc.ptc_fans WHERE id > 1",
    "SELECT COUNT(*) FROM s_ptc.ptc_games GROUP BY x",
    "SELECT 1",
    "",
    "WITH x AS (SELECT * FROM s_ptc.ptc_a) SELECT * FROM x JOIN AwsDataCatalog.b.c_vw ON 1 = 1",
];

type Pick = (usize, usize);

/// A feed, an independent shuffle of it, and a split point.
fn feed_and_shuffle() -> impl Strategy<Value = (Vec<Pick>, Vec<Pick>, usize)> {
    prop::collection::vec((0usize..3, 0usize..6), 0..30).prop_flat_map(|picks| {
        let len = picks.len();
        (Just(picks.clone()), Just(picks).prop_shuffle(), 0..=len)
    })
}

fn analyze_picks(analyzer: &QueryAnalyzer, picks: &[Pick]) -> Vec<AnalyzedQuery> {
    picks
        .iter()
        .map(|(org, text)| analyzer.analyze_text(ORGS[*org], TEXTS[*text]))
        .collect()
}

proptest! {
    #[test]
    fn aggregation_is_order_independent((picks, shuffled, _) in feed_and_shuffle()) {
        let analyzer = analyzer();
        let queries = analyze_picks(&analyzer, &picks);
        let permuted = analyze_picks(&analyzer, &shuffled);

        prop_assert_eq!(UsageAggregator::summarize(&queries), UsageAggregator::summarize(&permuted));
        prop_assert_eq!(UsageAggregator::table_usage(&queries), UsageAggregator::table_usage(&permuted));
        prop_assert_eq!(
            UsageAggregator::environment_usage(&queries),
            UsageAggregator::environment_usage(&permuted)
        );
    }

    #[test]
    fn split_folds_merge_to_the_single_fold((picks, shuffled, split) in feed_and_shuffle()) {
        let analyzer = analyzer();
        let queries = analyze_picks(&analyzer, &picks);
        let permuted = analyze_picks(&analyzer, &shuffled);
        let (left, right) = permuted.split_at(split);

        let mut whole = OrganizationAccumulator::new("ARI");
        queries.iter().for_each(|q| whole.add(q));
        let mut merged = OrganizationAccumulator::new("ARI");
        let mut tail = OrganizationAccumulator::new("ARI");
        left.iter().for_each(|q| merged.add(q));
        right.iter().for_each(|q| tail.add(q));
        merged.merge(tail);
        prop_assert_eq!(whole.finish(), merged.finish());

        let mut whole = TableAccumulator::default();
        queries.iter().for_each(|q| whole.add(q));
        let mut merged = TableAccumulator::default();
        let mut tail = TableAccumulator::default();
        left.iter().for_each(|q| merged.add(q));
        right.iter().for_each(|q| tail.add(q));
        merged.merge(tail);
        prop_assert_eq!(whole.finish(), merged.finish());
    }
}
