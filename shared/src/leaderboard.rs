use crate::config::{TOP_CREWS, TOP_MEMBERS};
use crate::state::LeaderboardTab;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRecord {
    pub name: String,
    pub stat_line: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTier {
    Gold,
    Silver,
    Bronze,
    Default,
}

impl BadgeTier {
    pub fn for_position(index: usize) -> Self {
        match index {
            0 => BadgeTier::Gold,
            1 => BadgeTier::Silver,
            2 => BadgeTier::Bronze,
            _ => BadgeTier::Default,
        }
    }

    pub fn css_class(self) -> Option<&'static str> {
        match self {
            BadgeTier::Gold => Some("gold"),
            BadgeTier::Silver => Some("silver"),
            BadgeTier::Bronze => Some("bronze"),
            BadgeTier::Default => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub rank: usize,
    pub badge: BadgeTier,
    pub name: String,
    pub stat_line: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedList {
    pub tab: LeaderboardTab,
    pub rows: Vec<RenderedRow>,
}

/// Records for a tab, in the order the data source ranks them.
pub fn records_for(tab: LeaderboardTab) -> Vec<RankedRecord> {
    let source = match tab {
        LeaderboardTab::Crews => TOP_CREWS,
        LeaderboardTab::Members => TOP_MEMBERS,
    };
    source
        .iter()
        .map(|&(name, stat)| RankedRecord {
            name: name.to_string(),
            stat_line: stat.to_string(),
        })
        .collect()
}

/// Rank rows by position. `records` must already be ordered best-first.
pub fn render(tab: LeaderboardTab, records: &[RankedRecord]) -> RenderedList {
    RenderedList {
        tab,
        rows: records
            .iter()
            .enumerate()
            .map(|(index, record)| RenderedRow {
                rank: index + 1,
                badge: BadgeTier::for_position(index),
                name: record.name.clone(),
                stat_line: record.stat_line.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<RankedRecord> {
        (0..n)
            .map(|i| RankedRecord {
                name: format!("crew {i}"),
                stat_line: String::new(),
            })
            .collect()
    }

    #[test]
    fn badges_follow_position_for_any_length() {
        for len in 0..8 {
            let list = render(LeaderboardTab::Crews, &records(len));
            assert_eq!(list.rows.len(), len);
            for (i, row) in list.rows.iter().enumerate() {
                let expected = match row.rank {
                    1 => BadgeTier::Gold,
                    2 => BadgeTier::Silver,
                    3 => BadgeTier::Bronze,
                    _ => BadgeTier::Default,
                };
                assert_eq!(row.rank, i + 1);
                assert_eq!(row.badge, expected);
            }
        }
    }

    #[test]
    fn default_tier_has_no_class() {
        assert_eq!(BadgeTier::Gold.css_class(), Some("gold"));
        assert_eq!(BadgeTier::Bronze.css_class(), Some("bronze"));
        assert_eq!(BadgeTier::Default.css_class(), None);
    }

    #[test]
    fn render_keeps_supplied_order() {
        let mut input = records_for(LeaderboardTab::Crews);
        input.reverse();
        let list = render(LeaderboardTab::Crews, &input);
        assert_eq!(list.rows[0].name, "Wave Riders");
        assert_eq!(list.rows[0].badge, BadgeTier::Gold);
    }

    #[test]
    fn tabs_have_distinct_sources() {
        let crews = records_for(LeaderboardTab::Crews);
        let members = records_for(LeaderboardTab::Members);
        assert_eq!(crews[0].name, "Ocean Warriors");
        assert_eq!(members[0].name, "Alex Chen");
        assert_eq!(members[0].stat_line, "\u{1F31F} 42 events, 180 hours");
    }
}
