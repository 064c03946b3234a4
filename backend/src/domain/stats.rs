//! Aggregate defect counts for leaders.

use super::{Defect, DefectStatus, Priority};

/// Count of defects sharing one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    pub status: DefectStatus,
    pub count: u64,
}

/// Count of defects sharing one priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: u64,
}

fn count_matching(defects: &[Defect], predicate: impl Fn(&Defect) -> bool) -> u64 {
    defects.iter().filter(|defect| predicate(defect)).count() as u64
}

/// Totals across every defect.
///
/// `by_status` and `by_priority` always list every variant in declaration
/// order, including zero counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefectStats {
    pub total: u64,
    pub unassigned: u64,
    pub by_status: Vec<StatusCount>,
    pub by_priority: Vec<PriorityCount>,
}

impl DefectStats {
    /// Tally the supplied defects.
    pub fn from_defects(defects: &[Defect]) -> Self {
        Self {
            total: defects.len() as u64,
            unassigned: count_matching(defects, |defect| defect.assignee.is_none()),
            by_status: DefectStatus::ALL
                .into_iter()
                .map(|status| StatusCount {
                    status,
                    count: count_matching(defects, |defect| defect.status == status),
                })
                .collect(),
            by_priority: Priority::ALL
                .into_iter()
                .map(|priority| PriorityCount {
                    priority,
                    count: count_matching(defects, |defect| defect.priority == priority),
                })
                .collect(),
        }
    }

    /// Count for a single status.
    pub fn status_count(&self, status: DefectStatus) -> u64 {
        self.by_status
            .iter()
            .find(|entry| entry.status == status)
            .map_or(0, |entry| entry.count)
    }

    /// Count for a single priority.
    pub fn priority_count(&self, priority: Priority) -> u64 {
        self.by_priority
            .iter()
            .find(|entry| entry.priority == priority)
            .map_or(0, |entry| entry.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DefectId, DefectTitle, Role, UserId, UserSummary, Username};
    use chrono::Utc;
    use rstest::rstest;

    fn defect(id: i64, status: DefectStatus, priority: Priority, assigned: bool) -> Defect {
        let person = |name: &str, role| UserSummary {
            id: UserId::random(),
            username: Username::new(name).expect("valid username"),
            role,
        };
        Defect {
            id: DefectId::new(id).expect("positive id"),
            title: DefectTitle::new(format!("defect {id}")).expect("valid title"),
            description: None,
            priority,
            status,
            author: person("manager", Role::Manager),
            assignee: assigned.then(|| person("engineer", Role::Engineer)),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn empty_store_reports_zeroes_for_every_variant() {
        let stats = DefectStats::from_defects(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.unassigned, 0);
        assert_eq!(stats.by_status.len(), DefectStatus::ALL.len());
        assert_eq!(stats.by_priority.len(), Priority::ALL.len());
        assert!(stats.by_status.iter().all(|entry| entry.count == 0));
    }

    #[rstest]
    fn groups_sum_to_total() {
        let defects = vec![
            defect(1, DefectStatus::New, Priority::High, true),
            defect(2, DefectStatus::New, Priority::Low, false),
            defect(3, DefectStatus::Closed, Priority::High, true),
            defect(4, DefectStatus::InReview, Priority::Medium, false),
        ];
        let stats = DefectStats::from_defects(&defects);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.unassigned, 2);
        assert_eq!(stats.status_count(DefectStatus::New), 2);
        assert_eq!(stats.status_count(DefectStatus::InProgress), 0);
        assert_eq!(stats.status_count(DefectStatus::Closed), 1);
        assert_eq!(stats.priority_count(Priority::High), 2);
        assert_eq!(
            stats.by_status.iter().map(|entry| entry.count).sum::<u64>(),
            stats.total
        );
        assert_eq!(
            stats.by_priority.iter().map(|entry| entry.count).sum::<u64>(),
            stats.total
        );
    }
}
