use crate::db::light::schema::{Light, LightStatus};
use serde::Serialize;

/// Status and free-text filter shared by the search page and the map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightFilter {
    pub status: Option<LightStatus>,
    pub query: Option<String>,
}

impl LightFilter {
    /// Blank values and the `all` status mean "no filter".
    pub fn new(status: Option<&str>, query: Option<&str>) -> Self {
        let status = status
            .map(str::trim)
            .filter(|it| !it.is_empty() && !it.eq_ignore_ascii_case("all"))
            .map(LightStatus::from);
        let query = query
            .map(str::trim)
            .filter(|it| !it.is_empty())
            .map(str::to_lowercase);
        LightFilter { status, query }
    }

    pub fn matches(&self, light: &Light) -> bool {
        let status_matches = match &self.status {
            Some(status) => &light.status == status,
            None => true,
        };
        let query_matches = match &self.query {
            Some(query) => search_fields(light)
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(query)),
            None => true,
        };
        status_matches && query_matches
    }

    pub fn apply(&self, lights: Vec<Light>) -> Vec<Light> {
        lights.into_iter().filter(|it| self.matches(it)).collect()
    }
}

fn search_fields(light: &Light) -> [Option<&str>; 4] {
    [
        Some(light.code.as_str()),
        light.address.as_deref(),
        light.subdistrict.as_deref(),
        light.ward.as_deref(),
    ]
}

#[derive(Serialize, Debug, Default, PartialEq, Eq)]
pub struct LightStats {
    pub total: usize,
    pub working: usize,
    pub reported: usize,
    pub maintenance: usize,
}

pub fn stats(lights: &[Light]) -> LightStats {
    lights.iter().fold(
        LightStats {
            total: lights.len(),
            ..LightStats::default()
        },
        |mut stats, light| {
            match light.status {
                LightStatus::Working => stats.working += 1,
                LightStatus::Reported => stats.reported += 1,
                LightStatus::Maintenance => stats.maintenance += 1,
                LightStatus::Other(_) => {}
            }
            stats
        },
    )
}

#[cfg(test)]
mod test {
    use super::LightFilter;
    use crate::db::light::schema::{Light, LightStatus};
    use time::OffsetDateTime;

    fn light(id: i64, code: &str, address: &str, status: LightStatus) -> Light {
        Light {
            id,
            code: code.into(),
            address: Some(address.into()),
            subdistrict: Some("Ilir Barat I".into()),
            ward: None,
            latitude: -2.99,
            longitude: 104.75,
            status,
            last_reported_at: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn lights() -> Vec<Light> {
        vec![
            light(1, "SL-1001", "Jl. Sudirman", LightStatus::Working),
            light(2, "SL-1002", "Jl. Merdeka", LightStatus::Reported),
            light(3, "SL-1003", "Jl. Kapten Rivai", LightStatus::Maintenance),
            light(4, "SL-1004", "Jl. Sudirman Ujung", LightStatus::Working),
            light(5, "PJU-77", "Jl. Demang", LightStatus::Other("padam".into())),
        ]
    }

    #[test]
    fn no_filter_keeps_everything_in_order() {
        let res = LightFilter::new(None, None).apply(lights());
        assert_eq!(lights(), res);
        let res = LightFilter::new(Some("all"), Some("  ")).apply(lights());
        assert_eq!(lights(), res);
    }

    #[test]
    fn status_filter_returns_only_matching() {
        for status in ["working", "reported", "maintenance", "padam"] {
            let filter = LightFilter::new(Some(status), None);
            let res = filter.apply(lights());
            assert!(!res.is_empty());
            assert!(res
                .iter()
                .all(|it| it.status == LightStatus::from(status)));
        }
        let res = LightFilter::new(Some("working"), None).apply(lights());
        assert_eq!(vec![1, 4], res.iter().map(|it| it.id).collect::<Vec<_>>());
    }

    #[test]
    fn query_is_case_insensitive_subset() {
        let all = lights();
        let filter = LightFilter::new(None, Some("SUDIRMAN"));
        let res = filter.apply(all.clone());
        assert_eq!(vec![1, 4], res.iter().map(|it| it.id).collect::<Vec<_>>());
        assert!(res.iter().all(|it| all.contains(it)));
    }

    #[test]
    fn query_matches_any_text_field() {
        assert_eq!(1, LightFilter::new(None, Some("pju")).apply(lights()).len());
        assert_eq!(5, LightFilter::new(None, Some("ilir barat")).apply(lights()).len());
        assert!(LightFilter::new(None, Some("Seberang Ulu"))
            .apply(lights())
            .is_empty());
    }

    #[test]
    fn status_and_query_combine() {
        let res = LightFilter::new(Some("working"), Some("ujung")).apply(lights());
        assert_eq!(vec![4], res.iter().map(|it| it.id).collect::<Vec<_>>());
    }

    #[test]
    fn stats() {
        let stats = super::stats(&lights());
        assert_eq!(5, stats.total);
        assert_eq!(2, stats.working);
        assert_eq!(1, stats.reported);
        assert_eq!(1, stats.maintenance);
    }
}
