use std::collections::HashSet;
use std::path::PathBuf;

use issue_dedup::{cluster, load_issues_file, score, DuplicateGroup, IssueRecord, SimilarityConfig};

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn sample_issues() -> Vec<IssueRecord> {
    load_issues_file(&fixtures_root().join("sample-issues.json")).unwrap()
}

fn shape(groups: &[DuplicateGroup<'_>]) -> Vec<(u64, Vec<u64>)> {
    groups
        .iter()
        .map(|g| (g.primary.number, g.member_numbers()))
        .collect()
}

fn grouped_count(groups: &[DuplicateGroup<'_>]) -> usize {
    groups.iter().map(|g| g.len() + 1).sum()
}

#[test]
fn fixture_loads_issues_without_pull_requests() {
    let issues = sample_issues();

    let numbers: Vec<u64> = issues.iter().map(|i| i.number).collect();
    assert_eq!(numbers, vec![5247, 5248, 5406, 5282, 5329, 5412]);
    assert_eq!(issues[5].assignee.as_deref(), Some("webview2-triage"));
    assert_eq!(
        issues[0].url,
        "https://github.com/MicrosoftEdge/WebView2Feedback/issues/5247"
    );
}

#[test]
fn dpi_freeze_pair_just_misses_default_threshold() {
    let issues = sample_issues();
    assert!(cluster(&issues, 0.7).unwrap().is_empty());

    let (overall, breakdown) = score(&issues[0], &issues[1], &SimilarityConfig::default());
    assert!((overall - 0.6920).abs() < 1e-3);
    assert!((breakdown.title - 0.6904).abs() < 1e-3);
    assert!((breakdown.body - 0.4214).abs() < 1e-3);
    assert_eq!(breakdown.labels, 1.0);
    assert_eq!(breakdown.keywords, 0.75);
}

#[test]
fn dpi_freeze_pair_clusters_at_lower_threshold_with_first_as_primary() {
    let issues = sample_issues();
    let pair = [issues[0].clone(), issues[1].clone()];

    let groups = cluster(&pair, 0.6).unwrap();
    assert_eq!(shape(&groups), vec![(5247, vec![5248])]);
    assert!((groups[0].members[0].score - 0.6920).abs() < 1e-3);
}

#[test]
fn looser_threshold_finds_second_group() {
    let issues = sample_issues();

    assert_eq!(shape(&cluster(&issues, 0.6).unwrap()), vec![(5247, vec![5248])]);
    assert_eq!(
        shape(&cluster(&issues, 0.5).unwrap()),
        vec![(5247, vec![5248]), (5406, vec![5412])]
    );
    assert_eq!(
        shape(&cluster(&issues, 0.45).unwrap()),
        vec![(5247, vec![5248, 5282]), (5406, vec![5412])]
    );
}

#[test]
fn version_and_url_noise_do_not_hide_duplicates() {
    let issues = sample_issues();
    let (overall, breakdown) = score(&issues[2], &issues[5], &SimilarityConfig::default());

    assert!((overall - 0.5690).abs() < 1e-3);
    assert!((breakdown.title - 0.6892).abs() < 1e-3);
    assert!((breakdown.body - 0.3719).abs() < 1e-3);
    assert_eq!(breakdown.keywords, 0.0);
}

#[test]
fn long_body_comparison_depends_on_argument_order() {
    let issues = sample_issues();
    let config = SimilarityConfig::default();

    // Frequent characters of the second body never seed a match.
    let (_, forward) = score(&issues[0], &issues[1], &config);
    let (_, backward) = score(&issues[1], &issues[0], &config);
    assert!((forward.body - 0.4214).abs() < 1e-3);
    assert!((backward.body - 0.0356).abs() < 1e-3);
    assert_eq!(forward.title, backward.title);
}

#[test]
fn strict_threshold_finds_nothing() {
    let issues = sample_issues();
    assert!(cluster(&issues, 0.8).unwrap().is_empty());
    assert!(cluster(&issues, 1.0).unwrap().is_empty());
}

#[test]
fn raising_threshold_never_groups_more_issues() {
    let issues = sample_issues();
    let counts: Vec<usize> = (0..=10)
        .map(|step| {
            let threshold = f64::from(step) / 10.0;
            grouped_count(&cluster(&issues, threshold).unwrap())
        })
        .collect();

    assert_eq!(counts[0], issues.len());
    assert!(counts.windows(2).all(|pair| pair[0] >= pair[1]), "{counts:?}");
}

#[test]
fn groups_partition_the_grouped_issues() {
    let issues = sample_issues();

    for threshold in [0.0, 0.35, 0.45, 0.5, 0.6, 0.7] {
        let groups = cluster(&issues, threshold).unwrap();
        let mut seen = HashSet::new();

        for group in &groups {
            assert!(!group.is_empty());
            assert!(seen.insert(group.primary.number));
            for member in &group.members {
                assert!(seen.insert(member.issue.number));
                assert!(member.score >= threshold);
            }
        }
    }
}

#[test]
fn input_order_decides_primary() {
    let mut issues = sample_issues();
    issues.swap(0, 1);

    assert_eq!(shape(&cluster(&issues, 0.6).unwrap()), vec![(5248, vec![5247])]);
    assert_eq!(
        shape(&cluster(&issues, 0.5).unwrap()),
        vec![(5248, vec![5247, 5282, 5329]), (5406, vec![5412])]
    );
}
