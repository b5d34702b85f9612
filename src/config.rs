use serde::{Deserialize, Serialize};

/// One entry in the ordered rank table. Order in `QuotaConfig::ranks` is
/// authority order, highest first.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RankDef {
    pub name: String,
    pub role_id: u64,
    /// Required hours per evaluation period. `None` means the rank has no
    /// configured quota and fails closed at tally time.
    #[serde(default)]
    pub quota_hours: Option<f64>,
    #[serde(default)]
    pub exempt: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuotaConfig {
    /// Highest authority first.
    pub ranks: Vec<RankDef>,
    pub leave_role_id: u64,
    pub reduced_role_id: u64,
    /// When set, only members holding this role are evaluated.
    #[serde(default)]
    pub unit_role_id: Option<u64>,
    /// Top N ranks allowed to run tally/reset.
    pub supervisor_rank_count: usize,
    /// Top N ranks allowed to log shifts for other members.
    pub proxy_rank_count: usize,
    #[serde(default = "default_rating_min")]
    pub rating_min: i64,
    #[serde(default = "default_rating_max")]
    pub rating_max: i64,
    /// When false, exempt members are omitted from the tally report instead
    /// of being listed with the exempt symbol.
    #[serde(default = "default_show_exempt")]
    pub show_exempt: bool,
}

fn default_rating_min() -> i64 {
    0
}

fn default_rating_max() -> i64 {
    10
}

fn default_show_exempt() -> bool {
    true
}

impl QuotaConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: QuotaConfig = serde_json::from_str(&raw)?;
        anyhow::ensure!(!config.ranks.is_empty(), "rank table is empty");
        anyhow::ensure!(
            config.supervisor_rank_count <= config.ranks.len(),
            "supervisor_rank_count exceeds rank table"
        );
        anyhow::ensure!(
            config.proxy_rank_count <= config.ranks.len(),
            "proxy_rank_count exceeds rank table"
        );
        Ok(config)
    }

    pub fn rank_by_name(&self, name: &str) -> Option<&RankDef> {
        self.ranks.iter().find(|r| r.name.eq_ignore_ascii_case(name))
    }
}

impl Default for QuotaConfig {
    /// The WSP deployment this bot was written for: eleven ranks, quotas on
    /// the bottom seven, top four exempt.
    fn default() -> Self {
        fn rank(name: &str, role_id: u64, quota_hours: Option<f64>, exempt: bool) -> RankDef {
            RankDef { name: name.to_string(), role_id, quota_hours, exempt }
        }
        QuotaConfig {
            ranks: vec![
                rank("Superintendent", 1393070510040154196, None, true),
                rank("Deputy Superintendent", 1393344391522943206, None, true),
                rank("Colonel", 1393070827934580786, None, true),
                rank("Lieutenant Colonel", 1393357571892445206, None, true),
                rank("Major", 1393071057279258806, Some(1.0), false),
                rank("Captain", 1393070960206413824, Some(1.0), false),
                rank("Lieutenant", 1393071005022425090, Some(1.5), false),
                rank("Sergeant", 1393071092746158110, Some(1.5), false),
                rank("Corporal", 1393071122836095078, Some(2.0), false),
                rank("Master Trooper", 1393071163617579038, Some(2.0), false),
                rank("Trooper", 1393071210908221543, Some(2.0), false),
            ],
            leave_role_id: 1393373147545341992,
            reduced_role_id: 1394775443634131074,
            unit_role_id: None,
            supervisor_rank_count: 6,
            proxy_rank_count: 4,
            rating_min: 0,
            rating_max: 10,
            show_exempt: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_ordered_and_bounded() {
        let config = QuotaConfig::default();
        assert_eq!(config.ranks.len(), 11);
        assert_eq!(config.ranks[0].name, "Superintendent");
        assert_eq!(config.ranks[10].name, "Trooper");
        assert!(config.supervisor_rank_count <= config.ranks.len());
        assert!(config.proxy_rank_count <= config.ranks.len());
    }

    #[test]
    fn rank_lookup_ignores_case() {
        let config = QuotaConfig::default();
        assert!(config.rank_by_name("trooper").is_some());
        assert!(config.rank_by_name("TROOPER").is_some());
        assert!(config.rank_by_name("Commodore").is_none());
    }

    #[test]
    fn json_round_trip_preserves_quotas() {
        let config = QuotaConfig::default();
        let raw = serde_json::to_string(&config).unwrap();
        let back: QuotaConfig = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.ranks.len(), config.ranks.len());
        assert_eq!(back.rank_by_name("Trooper").unwrap().quota_hours, Some(2.0));
        assert!(back.rank_by_name("Colonel").unwrap().exempt);
    }

    #[test]
    fn missing_optional_fields_fall_back() {
        let raw = r#"{
            "ranks": [{"name": "Trooper", "role_id": 1, "quota_hours": 2.0}],
            "leave_role_id": 2,
            "reduced_role_id": 3,
            "supervisor_rank_count": 1,
            "proxy_rank_count": 1
        }"#;
        let config: QuotaConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.rating_min, 0);
        assert_eq!(config.rating_max, 10);
        assert!(config.show_exempt);
        assert!(config.unit_role_id.is_none());
        assert!(!config.ranks[0].exempt);
    }
}
