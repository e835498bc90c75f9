use std::collections::{HashMap, HashSet};

use crate::models::waitlist_models::WaitlistEntry;

/// Deletion plan for one resolver pass over the waitlist collection.
pub struct DeletionPlan {
    pub total: usize,
    pub to_delete: Vec<String>,
}

/// Computes the minimal deletion set that leaves at most one record per
/// normalized email and at most one per normalized phone, keeping the
/// earliest-created record in each group. The two dimensions are grouped
/// independently and their marks unioned. Records with an empty key are
/// excluded from that dimension. Pure function; the caller does the I/O.
///
/// A record with no create time sorts as 0 and therefore always survives its
/// group, even against records that are genuinely older. Intentional: the
/// store assigns create times, so a missing one means the record predates
/// that bookkeeping and there is nothing better to order it by.
pub fn plan_deletions(entries: &[WaitlistEntry]) -> DeletionPlan {
    let mut email_groups: HashMap<String, Vec<&WaitlistEntry>> = HashMap::new();
    let mut phone_groups: HashMap<String, Vec<&WaitlistEntry>> = HashMap::new();
    for entry in entries {
        let email = entry.email.trim().to_lowercase();
        if !email.is_empty() {
            email_groups.entry(email).or_default().push(entry);
        }
        let phone = entry.phone.trim();
        if !phone.is_empty() {
            phone_groups.entry(phone.to_string()).or_default().push(entry);
        }
    }

    let mut marked = HashSet::new();
    let mut to_delete = Vec::new();
    mark_losers(email_groups, &mut marked, &mut to_delete);
    mark_losers(phone_groups, &mut marked, &mut to_delete);

    DeletionPlan {
        total: entries.len(),
        to_delete,
    }
}

fn mark_losers<'a>(
    groups: HashMap<String, Vec<&'a WaitlistEntry>>,
    marked: &mut HashSet<String>,
    to_delete: &mut Vec<String>,
) {
    for (_, mut group) in groups {
        if group.len() < 2 {
            continue;
        }
        // stable sort: equal create times keep collection order
        group.sort_by_key(|entry| entry.created_at.unwrap_or(0));
        for entry in &group[1..] {
            if marked.insert(entry.id.clone()) {
                to_delete.push(entry.id.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, email: &str, phone: &str, created_at: Option<i64>) -> WaitlistEntry {
        WaitlistEntry {
            id: id.to_string(),
            full_name: String::new(),
            email: email.to_string(),
            phone: phone.to_string(),
            user_id: None,
            user_email: None,
            sign_in_method: None,
            created_at,
        }
    }

    #[test]
    fn keeps_earliest_record_per_email() {
        // store scenario: a@x.com at t=100, a@x.com at t=50, b@x.com at t=200
        let entries = vec![
            entry("one", "a@x.com", "1", Some(100)),
            entry("two", "a@x.com", "2", Some(50)),
            entry("three", "b@x.com", "3", Some(200)),
        ];
        let plan = plan_deletions(&entries);
        assert_eq!(plan.total, 3);
        assert_eq!(plan.to_delete, vec!["one".to_string()]);
    }

    #[test]
    fn tie_break_prefers_smaller_timestamp() {
        let entries = vec![
            entry("late", "a@x.com", "", Some(200)),
            entry("early", "a@x.com", "", Some(100)),
        ];
        let plan = plan_deletions(&entries);
        assert_eq!(plan.to_delete, vec!["late".to_string()]);
    }

    #[test]
    fn email_normalization_is_case_insensitive() {
        let entries = vec![
            entry("upper", "A@X.COM ", "", Some(5)),
            entry("lower", "a@x.com", "", Some(9)),
        ];
        let plan = plan_deletions(&entries);
        assert_eq!(plan.to_delete, vec!["lower".to_string()]);
    }

    #[test]
    fn email_and_phone_dimensions_are_unioned() {
        // "b" duplicates "a" by email, "c" duplicates "a" by phone
        let entries = vec![
            entry("a", "a@x.com", "111", Some(1)),
            entry("b", "a@x.com", "222", Some(2)),
            entry("c", "c@x.com", "111", Some(3)),
        ];
        let plan = plan_deletions(&entries);
        let deleted: HashSet<_> = plan.to_delete.iter().cloned().collect();
        assert_eq!(deleted, HashSet::from(["b".to_string(), "c".to_string()]));
    }

    #[test]
    fn missing_create_time_always_survives() {
        // sorts as 0, so it wins over genuinely older records
        let entries = vec![
            entry("dated", "a@x.com", "", Some(5)),
            entry("undated", "a@x.com", "", None),
        ];
        let plan = plan_deletions(&entries);
        assert_eq!(plan.to_delete, vec!["dated".to_string()]);
    }

    #[test]
    fn empty_keys_are_excluded_from_grouping() {
        let entries = vec![
            entry("a", "", "", Some(1)),
            entry("b", "", "", Some(2)),
            entry("c", "  ", "", Some(3)),
        ];
        let plan = plan_deletions(&entries);
        assert!(plan.to_delete.is_empty());
    }

    #[test]
    fn at_most_one_survivor_per_key() {
        let entries = vec![
            entry("a", "a@x.com", "", Some(3)),
            entry("b", "a@x.com", "", Some(1)),
            entry("c", "a@x.com", "", Some(2)),
        ];
        let plan = plan_deletions(&entries);
        assert_eq!(plan.to_delete.len(), 2);
        assert!(!plan.to_delete.contains(&"b".to_string()));
    }

    #[test]
    fn second_pass_is_idempotent() {
        let entries = vec![
            entry("a", "a@x.com", "111", Some(1)),
            entry("b", "a@x.com", "111", Some(2)),
            entry("c", "b@x.com", "222", Some(3)),
        ];
        let plan = plan_deletions(&entries);
        let deleted: HashSet<_> = plan.to_delete.iter().cloned().collect();
        let survivors: Vec<WaitlistEntry> = entries
            .into_iter()
            .filter(|e| !deleted.contains(&e.id))
            .collect();
        let second = plan_deletions(&survivors);
        assert_eq!(second.total, survivors.len());
        assert!(second.to_delete.is_empty());
    }
}
