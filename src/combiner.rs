use std::collections::HashSet;

use crate::data_models::CandidateItem;

/// Final page size of the external contract.
pub const RESULT_CAP: usize = 10;

/// Displayable items first, then backfill from `candidates` until `cap` is
/// reached. Both parts keep their input order and no link appears twice.
pub fn combine(
    displayable: &[CandidateItem],
    candidates: &[CandidateItem],
    cap: usize,
) -> Vec<CandidateItem> {
    let mut taken: HashSet<&str> = HashSet::new();
    displayable
        .iter()
        .chain(candidates)
        .filter(|&c| taken.insert(c.link.as_str()))
        .take(cap)
        .cloned()
        .collect()
}

#[cfg(test)]
fn items(prefix: &str, n: usize) -> Vec<CandidateItem> {
    (0..n)
        .map(|i| {
            CandidateItem::new(
                format!("https://{prefix}{i}.example/"),
                format!("{prefix} {i}"),
                "",
            )
        })
        .collect()
}

#[test]
fn test_combine_backfills_in_original_order() {
    let all = items("site", 8);
    let displayable = vec![all[5].clone(), all[1].clone(), all[6].clone()];

    let got = combine(&displayable, &all, RESULT_CAP);
    let links: Vec<&str> = got.iter().map(|c| c.link.as_str()).collect();

    assert_eq!(got.len(), 8);
    assert_eq!(
        links,
        vec![
            "https://site5.example/",
            "https://site1.example/",
            "https://site6.example/",
            "https://site0.example/",
            "https://site2.example/",
            "https://site3.example/",
            "https://site4.example/",
            "https://site7.example/",
        ]
    );
}

#[test]
fn test_combine_without_displayable_takes_prefix() {
    let all = items("site", 12);
    let got = combine(&[], &all, RESULT_CAP);
    assert_eq!(got, all[..10].to_vec());
}

#[test]
fn test_combine_truncates_displayable() {
    let all = items("site", 15);
    let got = combine(&all, &all, RESULT_CAP);
    assert_eq!(got, all[..10].to_vec());
}

#[test]
fn test_combine_empty_inputs() {
    assert!(combine(&[], &[], RESULT_CAP).is_empty());
    let all = items("site", 3);
    assert!(combine(&all, &all, 0).is_empty());
}

#[test]
fn test_combine_never_repeats_a_link() {
    let all = items("site", 4);
    let with_dupes = vec![
        all[0].clone(),
        all[1].clone(),
        all[1].clone(),
        all[2].clone(),
        all[0].clone(),
        all[3].clone(),
    ];
    let displayable = vec![all[2].clone(), all[2].clone()];

    let got = combine(&displayable, &with_dupes, RESULT_CAP);
    let links: Vec<&str> = got.iter().map(|c| c.link.as_str()).collect();
    assert_eq!(
        links,
        vec![
            "https://site2.example/",
            "https://site0.example/",
            "https://site1.example/",
            "https://site3.example/",
        ]
    );
}
