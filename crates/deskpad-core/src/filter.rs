use anyhow::anyhow;

use crate::item::TodoItem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl ViewFilter {
    pub fn parse(token: &str) -> anyhow::Result<Self> {
        match token.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(anyhow!(
                "unknown filter: {other} (expected all, active or completed)"
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn matches(&self, item: &TodoItem) -> bool {
        match self {
            Self::All => true,
            Self::Active => !item.completed,
            Self::Completed => item.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::ViewFilter;
    use crate::item::TodoItem;

    #[test]
    fn parses_the_three_recognized_values() {
        assert_eq!(ViewFilter::parse("all").unwrap(), ViewFilter::All);
        assert_eq!(ViewFilter::parse("Active").unwrap(), ViewFilter::Active);
        assert_eq!(
            ViewFilter::parse("COMPLETED").unwrap(),
            ViewFilter::Completed
        );
        assert!(ViewFilter::parse("done").is_err());
        assert!(ViewFilter::parse("").is_err());
    }

    #[test]
    fn matches_by_completion_state() {
        let now = Utc.with_ymd_and_hms(2026, 8, 21, 9, 0, 0).unwrap();
        let mut item = TodoItem::new("water plants".to_string(), now);

        assert!(ViewFilter::All.matches(&item));
        assert!(ViewFilter::Active.matches(&item));
        assert!(!ViewFilter::Completed.matches(&item));

        item.completed = true;
        assert!(ViewFilter::All.matches(&item));
        assert!(!ViewFilter::Active.matches(&item));
        assert!(ViewFilter::Completed.matches(&item));
    }

    #[test]
    fn default_is_all() {
        assert_eq!(ViewFilter::default(), ViewFilter::All);
    }
}
