use phainspect::config::Config;
use phainspect::core::attachment::AttachmentLogic;
use phainspect::core::dashboard::DashboardLogic;
use phainspect::core::inspection::InspectionLogic;
use phainspect::core::pmi::PmiLogic;
use phainspect::core::response::ResponseLogic;
use phainspect::db::pool::DbPool;
use phainspect::errors::AppError;
use phainspect::models::attachment::{SignatureType, UploadImageRequest, UploadSignatureRequest};
use phainspect::models::dashboard::DashboardFilter;
use phainspect::models::inspection::{
    CreateInspectionRequest, InspectionFilter, InspectionStatus, SubmitInspectionRequest,
};
use phainspect::models::pmi::CreatePmiResponseRequest;
use phainspect::models::response::{CreateResponseRequest, ResponseOutcome};

fn setup() -> (DbPool, Config) {
    (
        DbPool::open_in_memory().expect("in-memory db"),
        Config::with_database(":memory:"),
    )
}

fn create(pool: &DbPool, cfg: &Config, unit: &str, site: &str, date: &str) -> String {
    InspectionLogic::create(
        pool,
        cfg,
        CreateInspectionRequest {
            unit_number: unit.into(),
            site_code: site.into(),
            site_name: Some(format!("Site {site}")),
            address: format!("{unit} Main St"),
            start_date: Some(date.into()),
            ..Default::default()
        },
    )
    .expect("create inspection")
}

fn answer(item: &str, response: &str) -> CreateResponseRequest {
    CreateResponseRequest {
        item_id: item.into(),
        response: response.into(),
        ..Default::default()
    }
}

#[test]
fn full_inspection_lifecycle() {
    let (pool, cfg) = setup();
    let so = create(&pool, &cfg, "041529", "901", "2025-05-02");

    ResponseLogic::save(&pool, &so, &answer("SB001", "OK")).unwrap();
    ResponseLogic::save(
        &pool,
        &so,
        &CreateResponseRequest {
            scope_of_work: Some("Replace toilet seal".into()),
            service_id: Some("PLB".into()),
            activity_code: Some("A7".into()),
            tenant_charge: Some(true),
            ..answer("B002", "Def")
        },
    )
    .unwrap();

    PmiLogic::save(
        &pool,
        &so,
        &CreatePmiResponseRequest {
            item_id: "PMI001".into(),
            category_id: "CAT001".into(),
            completed: Some(true),
            notes: None,
        },
    )
    .unwrap();

    AttachmentLogic::upload_signature(
        &pool,
        &cfg,
        &so,
        &UploadSignatureRequest {
            signature_type: "tenant".into(),
            signed_by: "Jane Tenant".into(),
            signature_data: "aGVsbG8=".into(),
            file_name: None,
        },
    )
    .unwrap();

    let progress = ResponseLogic::progress(&pool, &so).unwrap();
    assert_eq!(progress.answered, 2);
    assert_eq!(progress.deficiencies, 1);

    let closed = InspectionLogic::submit(&pool, &so, SubmitInspectionRequest::default()).unwrap();
    assert_eq!(closed.status, InspectionStatus::Closed);
    assert!(closed.submit_time.is_some());
    assert!(closed.completion_date.is_some());

    // every child write is rejected once closed
    assert!(matches!(
        ResponseLogic::save(&pool, &so, &answer("SB002", "OK")),
        Err(AppError::InspectionClosed(_))
    ));
    assert!(matches!(
        ResponseLogic::delete(&pool, &so, "SB001"),
        Err(AppError::InspectionClosed(_))
    ));
    assert!(matches!(
        AttachmentLogic::delete_signature(&pool, &so, SignatureType::Tenant),
        Err(AppError::InspectionClosed(_))
    ));

    // reads still work
    assert_eq!(ResponseLogic::list(&pool, &so).unwrap().len(), 2);
    let sig = AttachmentLogic::signature_data(&pool, &so, SignatureType::Tenant).unwrap();
    assert_eq!(sig, b"hello");
}

#[test]
fn second_response_overwrites_first() {
    let (pool, cfg) = setup();
    let so = create(&pool, &cfg, "041529", "901", "2025-05-02");

    ResponseLogic::save(&pool, &so, &answer("K004", "ok")).unwrap();
    ResponseLogic::save(&pool, &so, &answer("K004", "na")).unwrap();

    let all = ResponseLogic::list(&pool, &so).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].outcome, ResponseOutcome::Na);
}

#[test]
fn unknown_checklist_item_is_rejected() {
    let (pool, cfg) = setup();
    let so = create(&pool, &cfg, "041529", "901", "2025-05-02");

    let err = ResponseLogic::save(&pool, &so, &answer("ZZ999", "OK")).unwrap_err();
    assert!(err.is_client_error());
}

#[test]
fn pmi_item_must_belong_to_category() {
    let (pool, cfg) = setup();
    let so = create(&pool, &cfg, "041529", "901", "2025-05-02");

    let err = PmiLogic::save(
        &pool,
        &so,
        &CreatePmiResponseRequest {
            item_id: "PMI001".into(),
            category_id: "CAT002".into(),
            completed: Some(true),
            notes: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn images_are_listed_newest_first_and_deleted_with_payload() {
    let (pool, cfg) = setup();
    let so = create(&pool, &cfg, "041529", "901", "2025-05-02");

    let upload = |caption: &str| {
        AttachmentLogic::upload_image(
            &pool,
            &cfg,
            &so,
            &UploadImageRequest {
                caption: Some(caption.into()),
                image_data: "iVBORw0KGgo=".into(),
                mime_type: "image/png".into(),
                ..Default::default()
            },
        )
        .unwrap()
    };
    let first = upload("first");
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = upload("second");

    let images = AttachmentLogic::list_images(&pool, &so).unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].image_id, second.image_id);

    AttachmentLogic::delete_image(&pool, &so, &first.image_id).unwrap();
    assert!(matches!(
        AttachmentLogic::image_data(&pool, &so, &first.image_id),
        Err(AppError::NotFound { .. })
    ));
    assert_eq!(AttachmentLogic::list_images(&pool, &so).unwrap().len(), 1);
}

#[test]
fn list_pages_are_zero_based_and_ordered() {
    let (pool, cfg) = setup();
    for i in 0..5 {
        create(&pool, &cfg, &format!("0000{i}"), "901", "2025-05-02");
    }

    let page = InspectionLogic::list(&pool, &cfg, &InspectionFilter::default(), 1, Some(2)).unwrap();
    assert_eq!(page.total_elements, 5);
    assert_eq!(page.total_pages, 3);
    let sos: Vec<_> = page.inspections.iter().map(|i| i.so_number.as_str()).collect();
    assert_eq!(sos, vec!["3184950", "3184951"]);

    assert!(InspectionLogic::list(&pool, &cfg, &InspectionFilter::default(), 0, Some(0)).is_err());
}

#[test]
fn dashboard_counts_by_site_and_month() {
    let (pool, cfg) = setup();
    create(&pool, &cfg, "1", "901", "2025-05-02");
    let so = create(&pool, &cfg, "2", "901", "2025-05-20");
    create(&pool, &cfg, "3", "801", "2025-05-03");
    create(&pool, &cfg, "4", "901", "2025-06-01");
    InspectionLogic::submit(&pool, &so, SubmitInspectionRequest::default()).unwrap();

    let summary = DashboardLogic::summary(
        &pool,
        &DashboardFilter {
            area: Some("SS".into()),
            year: Some(2025),
            month: Some(5),
            site_code: None,
        },
    )
    .unwrap();

    assert_eq!(summary.sites.len(), 1);
    let site = &summary.sites[0];
    assert_eq!(site.site_code, "901");
    assert_eq!(site.new_count, 1);
    assert_eq!(site.closed_count, 1);
    assert_eq!(site.total, 2);
    assert_eq!(summary.totals.total, 2);
}
