//! End-to-end screen flows over the scripted transport.

use klinik_core::api::{Method, RequestBody};
use klinik_core::models::NOT_AVAILABLE;
use klinik_core::screen::screen_for;
use klinik_core::{
    AppContext, Appointment, AppointmentStatus, Dashboard, EntityKind, ListScreen, LoadState,
    MockTransport, ProfileScreen, ScreenEffect,
};
use serde_json::json;

fn logged_in() -> (MockTransport, AppContext) {
    let mock = MockTransport::new();
    let mut ctx = AppContext::in_memory(mock.client()).unwrap();
    ctx.session.login("T1").unwrap();
    (mock, ctx)
}

fn script_appointments(mock: &MockTransport) {
    mock.on_json(
        Method::Get,
        "/patients",
        200,
        json!([{"id": 1, "nama": "Budi"}, {"id": 2, "nama": "Siti"}]),
    );
    mock.on_json(Method::Get, "/doctors", 200, json!([{"id": 10, "nama": "dr. Andi"}]));
    mock.on_json(
        Method::Get,
        "/appointments",
        200,
        json!([
            {"id": 1, "patient_id": 1, "doctor_id": 10, "tanggal": "2024-05-01", "status": "terjadwal"},
            {"id": 2, "patient_id": 2, "doctor_id": 99, "tanggal": "2024-05-02", "status": "selesai"},
            {"id": 3, "patient_id": 42, "doctor_id": "10", "tanggal": "2024-05-03", "status": "batal"}
        ]),
    );
}

fn mounted(mock: &MockTransport, ctx: &AppContext) -> ListScreen<Appointment> {
    script_appointments(mock);
    let mut screen = ListScreen::<Appointment>::new();
    assert_eq!(screen.mount(ctx), ScreenEffect::None);
    assert_eq!(screen.state(), &LoadState::Loaded);
    screen
}

#[test]
fn test_load_fetches_references_first() {
    let (mock, ctx) = logged_in();
    mounted(&mock, &ctx);

    let order: Vec<String> = mock.requests().iter().map(|r| r.url.clone()).collect();
    assert_eq!(order.len(), 3);
    assert!(order[0].ends_with("/patients"));
    assert!(order[1].ends_with("/doctors"));
    assert!(order[2].ends_with("/appointments"));
    assert!(mock
        .requests()
        .iter()
        .all(|r| r.bearer.as_deref() == Some("T1")));
}

#[test]
fn test_join_placeholder_only_for_dangling_keys() {
    let (mock, ctx) = logged_in();
    let screen = mounted(&mock, &ctx);

    let rows = screen.items();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].patient_name, "Budi");
    assert_eq!(rows[0].doctor_name, "dr. Andi");
    assert_eq!(rows[1].patient_name, "Siti");
    assert_eq!(rows[1].doctor_name, NOT_AVAILABLE);
    assert_eq!(rows[2].patient_name, NOT_AVAILABLE);
    assert_eq!(rows[2].doctor_name, "dr. Andi");
    assert_eq!(rows[2].status, AppointmentStatus::Cancelled);
}

#[test]
fn test_create_appends_one_row() {
    let (mock, ctx) = logged_in();
    let mut screen = mounted(&mock, &ctx);
    let before = screen.items().to_vec();

    mock.on_json(
        Method::Post,
        "/appointments",
        201,
        json!({"id": 4, "patient_id": 2, "doctor_id": 10, "tanggal": "2024-06-01", "status": "terjadwal"}),
    );

    screen.open_create();
    screen.set_form_field("patient_id", "2").unwrap();
    screen.set_form_field("doctor_id", "10").unwrap();
    screen.set_form_field("tanggal", "2024-06-01").unwrap();
    assert_eq!(screen.submit_form(&ctx), ScreenEffect::None);

    assert!(screen.form().is_none());
    let rows = screen.items();
    assert_eq!(rows.len(), before.len() + 1);
    assert_eq!(&rows[..before.len()], &before[..]);
    let added = &rows[before.len()];
    assert_eq!(added.id, 4);
    assert_eq!(added.patient_name, "Siti");
    assert_eq!(added.doctor_name, "dr. Andi");

    let post = &mock.requests_to(Method::Post, "/appointments")[0];
    match &post.body {
        Some(RequestBody::Json(body)) => {
            assert_eq!(body["patient_id"], json!(2));
            assert_eq!(body["status"], json!("terjadwal"));
        }
        other => panic!("expected JSON body, got {:?}", other),
    }
}

#[test]
fn test_edit_replaces_only_matching_row() {
    let (mock, ctx) = logged_in();
    let mut screen = mounted(&mock, &ctx);
    let before = screen.items().to_vec();

    mock.on_json(
        Method::Put,
        "/appointments/2",
        200,
        json!({"id": 2, "patient_id": 2, "doctor_id": 10, "tanggal": "2024-05-02", "status": "batal"}),
    );

    screen.open_edit(2).unwrap();
    screen.set_form_field("doctor_id", "10").unwrap();
    screen.set_form_field("status", "batal").unwrap();
    screen.submit_form(&ctx);

    let rows = screen.items();
    assert_eq!(rows.len(), before.len());
    assert_eq!(rows[0], before[0]);
    assert_eq!(rows[2], before[2]);
    assert_eq!(rows[1].doctor_name, "dr. Andi");
    assert_eq!(rows[1].status, AppointmentStatus::Cancelled);
}

#[test]
fn test_delete_confirm_and_cancel() {
    let (mock, ctx) = logged_in();
    let mut screen = mounted(&mock, &ctx);
    mock.on(Method::Delete, "/appointments/1", 204, "");

    screen.request_delete(3).unwrap();
    screen.cancel_delete();
    assert!(screen.delete_confirmation().is_none());
    assert_eq!(screen.items().len(), 3);
    assert!(mock.requests_to(Method::Delete, "/appointments/3").is_empty());

    screen.request_delete(1).unwrap();
    screen.confirm_delete(&ctx);
    let ids: Vec<_> = screen.items().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![2, 3]);
    assert!(screen.delete_confirmation().is_none());
    assert_eq!(screen.take_alert(), None);
}

#[test]
fn test_missing_token_makes_no_requests() {
    let mock = MockTransport::new();
    let ctx = AppContext::in_memory(mock.client()).unwrap();

    for kind in EntityKind::ALL {
        let mut screen = screen_for(kind);
        assert_eq!(screen.mount(&ctx), ScreenEffect::RedirectToLogin, "{}", kind);
    }
    assert_eq!(Dashboard::new().mount(&ctx), ScreenEffect::RedirectToLogin);
    assert_eq!(ProfileScreen::new().mount(&ctx), ScreenEffect::RedirectToLogin);

    assert_eq!(mock.request_count(), 0);
}

#[test]
fn test_token_removed_between_operations() {
    let (mock, mut ctx) = logged_in();
    let mut screen = mounted(&mock, &ctx);
    let sent = mock.request_count();

    ctx.session.logout().unwrap();
    screen.open_create();
    assert_eq!(screen.submit_form(&ctx), ScreenEffect::RedirectToLogin);
    screen.cancel_form();
    screen.request_delete(1).unwrap();
    assert_eq!(screen.confirm_delete(&ctx), ScreenEffect::RedirectToLogin);

    assert_eq!(mock.request_count(), sent);
    assert_eq!(screen.items().len(), 3);
}

#[test]
fn test_erased_screen_search() {
    let (mock, ctx) = logged_in();
    mock.on_json(
        Method::Get,
        "/patients",
        200,
        json!([
            {"id": 1, "nama": "Aloysia", "tanggal_lahir": "1999-01-01", "kontak": "0887"},
            {"id": 2, "nama": "Budi", "tanggal_lahir": "1980-02-02", "kontak": "0812"}
        ]),
    );

    let mut screen = screen_for(EntityKind::Patients);
    screen.mount(&ctx);
    screen.set_search("aloy");

    let rows = screen.visible_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 1);
    assert_eq!(screen.row_count(), 2);
    assert_eq!(screen.columns()[0], "ID");
}

#[test]
fn test_blank_reference_name_is_not_dangling() {
    let (mock, ctx) = logged_in();
    mock.on_json(Method::Get, "/patients", 200, json!([{"id": 1, "nama": ""}]));
    mock.on_json(Method::Get, "/doctors", 200, json!([{"id": 10}]));
    mock.on_json(
        Method::Get,
        "/appointments",
        200,
        json!([{"id": 1, "patient_id": 1, "doctor_id": 10, "tanggal": "2024-05-01", "status": "terjadwal"}]),
    );

    let mut screen = ListScreen::<Appointment>::new();
    screen.mount(&ctx);

    let row = &screen.items()[0];
    assert_eq!(row.patient_id, Some(1));
    assert_eq!(row.patient_name, "");
    assert_eq!(row.doctor_name, "");
}
