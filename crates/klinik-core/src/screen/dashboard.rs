//! Dashboard: completed visits per month and today's doctor checklist.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ScreenEffect;
use crate::api::{ApiClient, ApiResult};
use crate::context::AppContext;
use crate::models::{de_string, DoctorWire, EntityId};

/// Completed appointments, filtered server-side.
pub const COMPLETED_APPOINTMENTS_PATH: &str = "/appointments?status=selesai";
pub const CHART_TITLE: &str = "GRAFIK PASIEN";

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// One bar of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub category: String,
    pub value: u32,
}

/// Draws a bar chart. The dashboard only produces the points.
pub trait ChartRenderer {
    fn render(&mut self, title: &str, points: &[ChartPoint]);
}

/// A doctor on today's checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoctorSlot {
    pub id: EntityId,
    pub name: String,
    pub scheduled: bool,
}

#[derive(Deserialize)]
struct CompletedVisit {
    #[serde(default, deserialize_with = "de_string")]
    tanggal: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dashboard {
    chart: Vec<ChartPoint>,
    doctors: Vec<DoctorSlot>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chart(&self) -> &[ChartPoint] {
        &self.chart
    }

    pub fn doctors(&self) -> &[DoctorSlot] {
        &self.doctors
    }

    /// Load both sections. Each fails on its own and stays empty.
    pub fn mount(&mut self, ctx: &AppContext) -> ScreenEffect {
        let Some(token) = ctx.bearer() else {
            return ScreenEffect::RedirectToLogin;
        };

        match fetch_visit_dates(&ctx.api, &token) {
            Ok(dates) => self.chart = monthly_counts(dates.iter().map(String::as_str)),
            Err(e) => warn!("Gagal mengambil data janji temu: {}", e),
        }

        match fetch_doctors(&ctx.api, &token) {
            Ok(doctors) => self.doctors = doctors,
            Err(e) => warn!("Gagal mengambil data dokter: {}", e),
        }

        debug!(bars = self.chart.len(), doctors = self.doctors.len(), "Dashboard loaded");
        ScreenEffect::None
    }

    /// Flip a doctor's checkbox. Local only.
    pub fn toggle_doctor(&mut self, id: EntityId) -> bool {
        match self.doctors.iter_mut().find(|d| d.id == id) {
            Some(slot) => {
                slot.scheduled = !slot.scheduled;
                true
            }
            None => false,
        }
    }

    pub fn render(&self, renderer: &mut dyn ChartRenderer) {
        renderer.render(CHART_TITLE, &self.chart);
    }
}

fn fetch_visit_dates(api: &ApiClient, token: &str) -> ApiResult<Vec<String>> {
    api.get_list(token, COMPLETED_APPOINTMENTS_PATH)?
        .into_iter()
        .map(|value| -> ApiResult<String> {
            let visit: CompletedVisit = serde_json::from_value(value)?;
            Ok(visit.tanggal)
        })
        .collect()
}

fn fetch_doctors(api: &ApiClient, token: &str) -> ApiResult<Vec<DoctorSlot>> {
    api.get_list(token, "/doctors")?
        .into_iter()
        .map(|value| -> ApiResult<DoctorSlot> {
            let doctor: DoctorWire = serde_json::from_value(value)?;
            Ok(DoctorSlot {
                id: doctor.id,
                name: doctor.nama,
                scheduled: true,
            })
        })
        .collect()
}

/// Short Indonesian month name of an ISO date, or the input when it does not parse.
pub fn month_label(date: &str) -> String {
    let day = date.get(..10).unwrap_or(date);
    match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
        Ok(parsed) => MONTHS[parsed.month0() as usize].to_string(),
        Err(_) => date.to_string(),
    }
}

/// Count dates per month label, in first-seen order.
pub fn monthly_counts<'a>(dates: impl IntoIterator<Item = &'a str>) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = Vec::new();
    for date in dates {
        let label = month_label(date);
        match points.iter_mut().find(|p| p.category == label) {
            Some(point) => point.value += 1,
            None => points.push(ChartPoint {
                category: label,
                value: 1,
            }),
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Method, MockTransport};
    use serde_json::json;

    #[test]
    fn test_month_labels() {
        assert_eq!(month_label("2024-05-01"), "Mei");
        assert_eq!(month_label("2024-08-17T09:30:00Z"), "Agu");
        assert_eq!(month_label("2024-12-31 23:59:59"), "Des");
        assert_eq!(month_label("besok"), "besok");
    }

    #[test]
    fn test_counts_keep_first_seen_order() {
        let points = monthly_counts(["2024-03-01", "2024-01-05", "2024-03-20", "??"]);
        assert_eq!(
            points,
            vec![
                ChartPoint { category: "Mar".into(), value: 2 },
                ChartPoint { category: "Jan".into(), value: 1 },
                ChartPoint { category: "??".into(), value: 1 },
            ]
        );
    }

    #[test]
    fn test_mount_without_token() {
        let mock = MockTransport::new();
        let ctx = AppContext::in_memory(mock.client()).unwrap();

        let mut dashboard = Dashboard::new();
        assert_eq!(dashboard.mount(&ctx), ScreenEffect::RedirectToLogin);
        assert_eq!(mock.request_count(), 0);
    }

    #[test]
    fn test_sections_fail_independently() {
        let mock = MockTransport::new();
        mock.on(Method::Get, COMPLETED_APPOINTMENTS_PATH, 500, "down");
        mock.on_json(
            Method::Get,
            "/doctors",
            200,
            json!([{"id": 1, "nama": "dr. Andi"}, {"id": "2", "nama": "dr. Rina"}]),
        );
        let mut ctx = AppContext::in_memory(mock.client()).unwrap();
        ctx.session.login("T1").unwrap();

        let mut dashboard = Dashboard::new();
        dashboard.mount(&ctx);

        assert!(dashboard.chart().is_empty());
        assert_eq!(dashboard.doctors().len(), 2);
        assert!(dashboard.doctors().iter().all(|d| d.scheduled));

        assert!(dashboard.toggle_doctor(2));
        assert!(!dashboard.doctors()[1].scheduled);
        assert!(!dashboard.toggle_doctor(9));
    }

    struct Recorder(Vec<(String, Vec<ChartPoint>)>);

    impl ChartRenderer for Recorder {
        fn render(&mut self, title: &str, points: &[ChartPoint]) {
            self.0.push((title.to_string(), points.to_vec()));
        }
    }

    #[test]
    fn test_render_hands_points_over() {
        let mock = MockTransport::new();
        mock.on_json(
            Method::Get,
            COMPLETED_APPOINTMENTS_PATH,
            200,
            json!([{"id": 1, "tanggal": "2024-05-01"}, {"id": 2, "tanggal": "2024-05-09"}]),
        );
        let mut ctx = AppContext::in_memory(mock.client()).unwrap();
        ctx.session.login("T1").unwrap();

        let mut dashboard = Dashboard::new();
        dashboard.mount(&ctx);

        let mut recorder = Recorder(Vec::new());
        dashboard.render(&mut recorder);
        assert_eq!(recorder.0[0].0, CHART_TITLE);
        assert_eq!(recorder.0[0].1, vec![ChartPoint { category: "Mei".into(), value: 2 }]);
        assert!(dashboard.doctors().is_empty());
    }
}
