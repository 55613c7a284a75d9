//! Admin Analytics
//!
//! Company-wide overview, per-board health and per-user workload, computed
//! from already-fetched records.

use std::collections::HashSet;

use serde::Serialize;

use board_store::{Board, Card, List, Member, TaskStatus};

use crate::session::Role;

/// Users need at least this many tasks to be ranked
const MIN_RANKED_TASKS: u32 = 3;
const TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardHealth {
    Healthy,
    AtRisk,
    Stalled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: u32,
    pub not_started: u32,
    pub in_progress: u32,
    pub done: u32,
}

impl StatusCounts {
    fn tally<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Self {
        let mut counts = Self::default();
        for card in cards {
            counts.total += 1;
            match card.status {
                TaskStatus::NotStarted => counts.not_started += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
                TaskStatus::Done => counts.done += 1,
            }
        }
        counts
    }

    fn percent(part: u32, total: u32) -> f64 {
        if total == 0 {
            0.0
        } else {
            part as f64 / total as f64 * 100.0
        }
    }

    /// Share of done tasks, rounded to a whole percent
    pub fn completion_rate(&self) -> u32 {
        Self::percent(self.done, self.total).round() as u32
    }

    pub fn health(&self) -> BoardHealth {
        if Self::percent(self.done, self.total) > 50.0 {
            BoardHealth::Healthy
        } else if Self::percent(self.not_started, self.total) > 50.0 {
            BoardHealth::Stalled
        } else {
            BoardHealth::AtRisk
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_users: u32,
    pub active_users: u32,
    pub total_boards: u32,
    pub tasks: StatusCounts,
    pub completion_rate: u32,
    /// One decimal place
    pub avg_tasks_per_user: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
    pub id: u32,
    pub title: String,
    pub tasks: StatusCounts,
    pub completion_rate: u32,
    pub health: BoardHealth,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDistribution {
    pub healthy: u32,
    pub at_risk: u32,
    pub stalled: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSection {
    pub all: Vec<BoardStats>,
    pub most_active: Vec<BoardStats>,
    pub health_distribution: HealthDistribution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetrics {
    pub user_id: String,
    pub name: String,
    pub username: String,
    pub role: Role,
    pub tasks: StatusCounts,
    pub completion_rate: u32,
    pub boards_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSection {
    pub all: Vec<UserMetrics>,
    pub top_performers: Vec<UserMetrics>,
    pub needing_support: Vec<UserMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub company_id: String,
    pub overview: Overview,
    pub board_stats: BoardSection,
    pub user_metrics: UserSection,
    /// Computation time (unix millis)
    pub generated_at: i64,
}

/// Build the analytics for `company_id`. Records of other companies, and
/// lists or cards outside the company's boards, are ignored.
pub fn compute(
    company_id: &str,
    boards: &[Board],
    lists: &[List],
    cards: &[Card],
    members: &[Member],
) -> Analytics {
    let boards: Vec<&Board> = boards.iter().filter(|b| b.company_id == company_id).collect();
    let members: Vec<&Member> = members.iter().filter(|m| m.company_id == company_id).collect();
    let board_ids: HashSet<u32> = boards.iter().map(|b| b.id).collect();
    let lists: Vec<&List> = lists.iter().filter(|l| board_ids.contains(&l.board_id)).collect();
    let list_ids: HashSet<u32> = lists.iter().map(|l| l.id).collect();
    let cards: Vec<&Card> = cards.iter().filter(|c| list_ids.contains(&c.list_id)).collect();

    // Known members first, then anyone assigned work, each once
    let mut active: Vec<&str> = Vec::new();
    for card in &cards {
        for user in &card.assigned_to {
            if !active.contains(&user.as_str()) {
                active.push(user);
            }
        }
    }
    let mut user_ids: Vec<&str> = members.iter().map(|m| m.id.as_str()).collect();
    for user in &active {
        if !user_ids.contains(user) {
            user_ids.push(user);
        }
    }

    let totals = StatusCounts::tally(cards.iter().copied());
    let avg_tasks_per_user = if active.is_empty() {
        0.0
    } else {
        (totals.total as f64 / active.len() as f64 * 10.0).round() / 10.0
    };
    let overview = Overview {
        total_users: user_ids.len() as u32,
        active_users: active.len() as u32,
        total_boards: boards.len() as u32,
        tasks: totals,
        completion_rate: totals.completion_rate(),
        avg_tasks_per_user,
    };

    let all_boards: Vec<BoardStats> = boards
        .iter()
        .map(|board| {
            let board_lists: HashSet<u32> = lists
                .iter()
                .filter(|l| l.board_id == board.id)
                .map(|l| l.id)
                .collect();
            let tasks = StatusCounts::tally(
                cards.iter().copied().filter(|c| board_lists.contains(&c.list_id)),
            );
            BoardStats {
                id: board.id,
                title: board.title.clone(),
                tasks,
                completion_rate: tasks.completion_rate(),
                health: tasks.health(),
            }
        })
        .collect();

    let mut most_active = all_boards.clone();
    most_active.sort_by(|a, b| b.tasks.total.cmp(&a.tasks.total));
    most_active.truncate(TOP_N);

    let mut health_distribution = HealthDistribution::default();
    for stats in &all_boards {
        match stats.health {
            BoardHealth::Healthy => health_distribution.healthy += 1,
            BoardHealth::AtRisk => health_distribution.at_risk += 1,
            BoardHealth::Stalled => health_distribution.stalled += 1,
        }
    }

    let all_users: Vec<UserMetrics> = user_ids
        .iter()
        .map(|user_id| {
            let tasks = StatusCounts::tally(cards.iter().copied().filter(|c| c.is_assigned_to(user_id)));
            let member = members.iter().find(|m| m.id == *user_id);
            UserMetrics {
                user_id: user_id.to_string(),
                name: member
                    .and_then(|m| m.name.clone())
                    .unwrap_or_else(|| user_id.to_string()),
                username: member
                    .map(|m| m.username.clone())
                    .unwrap_or_else(|| user_id.to_string()),
                role: Role::Member,
                tasks,
                completion_rate: tasks.completion_rate(),
                boards_count: boards.iter().filter(|b| b.is_member(user_id)).count() as u32,
            }
        })
        .collect();

    let ranked: Vec<&UserMetrics> = all_users
        .iter()
        .filter(|u| u.tasks.total >= MIN_RANKED_TASKS)
        .collect();
    let mut top_performers: Vec<UserMetrics> = ranked.iter().map(|u| (*u).clone()).collect();
    top_performers.sort_by(|a, b| b.completion_rate.cmp(&a.completion_rate));
    top_performers.truncate(TOP_N);
    let mut needing_support: Vec<UserMetrics> = ranked.iter().map(|u| (*u).clone()).collect();
    needing_support.sort_by(|a, b| a.completion_rate.cmp(&b.completion_rate));
    needing_support.truncate(TOP_N);

    Analytics {
        company_id: company_id.to_string(),
        overview,
        board_stats: BoardSection {
            all: all_boards,
            most_active,
            health_distribution,
        },
        user_metrics: UserSection {
            all: all_users,
            top_performers,
            needing_support,
        },
        generated_at: chrono::Utc::now().timestamp_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(id: u32, company: &str, members: &[&str]) -> Board {
        let mut board = Board::new(company.to_string(), format!("Board {}", id), None);
        board.id = id;
        board.members = members.iter().map(|m| m.to_string()).collect();
        board
    }

    fn list(id: u32, board_id: u32) -> List {
        let mut list = List::new(board_id, format!("List {}", id));
        list.id = id;
        list
    }

    fn card(id: u32, list_id: u32, status: TaskStatus, assigned: &[&str]) -> Card {
        let mut card = Card::new(list_id, format!("Card {}", id), None);
        card.id = id;
        card.status = status;
        card.assigned_to = assigned.iter().map(|a| a.to_string()).collect();
        card
    }

    #[test]
    fn test_health_thresholds() {
        let counts = |not_started, in_progress, done| StatusCounts {
            total: not_started + in_progress + done,
            not_started,
            in_progress,
            done,
        };
        assert_eq!(counts(0, 1, 2).health(), BoardHealth::Healthy);
        assert_eq!(counts(2, 0, 2).health(), BoardHealth::AtRisk);
        assert_eq!(counts(3, 1, 0).health(), BoardHealth::Stalled);
        assert_eq!(counts(0, 0, 0).health(), BoardHealth::AtRisk);
        assert_eq!(counts(1, 1, 1).completion_rate(), 33);
    }

    #[test]
    fn test_compute_scopes_to_company() {
        use TaskStatus::*;
        let boards = vec![board(1, "biz", &["u1", "u2"]), board(2, "biz", &["u1"]), board(3, "other", &[])];
        let lists = vec![list(10, 1), list(20, 2), list(30, 3)];
        let cards = vec![
            card(1, 10, Done, &["u1"]),
            card(2, 10, Done, &["u1"]),
            card(3, 10, InProgress, &["u1", "u2"]),
            card(4, 20, NotStarted, &["u2"]),
            card(5, 20, NotStarted, &[]),
            card(6, 30, Done, &["u9"]),
        ];
        let mut ada = Member::new("u1".to_string(), "biz".to_string(), "ada".to_string());
        ada.name = Some("Ada".to_string());
        let members = vec![ada, Member::new("u3".to_string(), "biz".to_string(), "idle".to_string())];

        let analytics = compute("biz", &boards, &lists, &cards, &members);

        let overview = &analytics.overview;
        assert_eq!(overview.total_boards, 2);
        assert_eq!(overview.tasks.total, 5);
        assert_eq!(overview.active_users, 2);
        assert_eq!(overview.total_users, 3);
        assert_eq!(overview.completion_rate, 40);
        assert_eq!(overview.avg_tasks_per_user, 2.5);

        let health: Vec<BoardHealth> = analytics.board_stats.all.iter().map(|b| b.health).collect();
        assert_eq!(health, vec![BoardHealth::Healthy, BoardHealth::Stalled]);
        assert_eq!(analytics.board_stats.most_active[0].id, 1);
        assert_eq!(analytics.board_stats.health_distribution.stalled, 1);

        let users = &analytics.user_metrics.all;
        let ids: Vec<&str> = users.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u3", "u2"]);
        assert_eq!(users[0].name, "Ada");
        assert_eq!(users[0].boards_count, 2);
        assert_eq!(users[2].name, "u2");
        assert_eq!(users[2].boards_count, 1);

        // Only u1 has three tasks
        assert_eq!(analytics.user_metrics.top_performers.len(), 1);
        assert_eq!(analytics.user_metrics.top_performers[0].completion_rate, 67);
        assert_eq!(analytics.user_metrics.needing_support[0].user_id, "u1");
    }

    #[test]
    fn test_empty_company() {
        let analytics = compute("none", &[], &[], &[], &[]);
        assert_eq!(analytics.overview.completion_rate, 0);
        assert_eq!(analytics.overview.avg_tasks_per_user, 0.0);
        assert!(analytics.board_stats.all.is_empty());
    }
}
