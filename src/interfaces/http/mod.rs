pub mod auth;
pub mod error;

use crate::application::use_cases::upload::{UploadRequest, PDF_CONTENT_TYPE};
use crate::domain::error::AppError;
use crate::domain::profile::ProfileInput;
use crate::infrastructure::config::ServerConfig;
use crate::interfaces::state::AppState;
use crate::shared::activity_log::{add_log, snapshot, SharedLogs};
use actix_cors::Cors;
use actix_web::{
    delete, dev::Server, get, http::header, post, put, web, App, HttpRequest, HttpResponse,
    HttpServer, Responder,
};
use auth::AuthUser;
use serde::Deserialize;
use std::sync::Arc;

pub use crate::shared::activity_log::LogEntry;

type HandlerResult = Result<HttpResponse, AppError>;

pub struct HttpState {
    pub app_state: Arc<AppState>,
    pub logs: SharedLogs,
}

impl HttpState {
    fn fail(&self, context: &str, err: AppError) -> AppError {
        add_log(&self.logs, "ERROR", "HttpApi", &format!("{}: {}", context, err));
        err
    }
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Deserialize)]
pub struct UploadQuery {
    pub title: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(snapshot(&data.logs))
}

#[get("/profile")]
async fn get_profile(data: web::Data<HttpState>, user: AuthUser) -> HandlerResult {
    let profile = data
        .app_state
        .profile_use_case
        .get(&user.0.user_id)
        .await
        .map_err(|e| data.fail("Loading profile failed", e))?;

    match profile {
        Some(profile) => Ok(HttpResponse::Ok().json(profile)),
        None => Err(AppError::NotFound("Profile has not been set up".to_string())),
    }
}

#[put("/profile")]
async fn put_profile(
    data: web::Data<HttpState>,
    user: AuthUser,
    input: web::Json<ProfileInput>,
) -> HandlerResult {
    let profile = data
        .app_state
        .profile_use_case
        .save(&user.0, input.into_inner())
        .await
        .map_err(|e| data.fail("Saving profile failed", e))?;
    Ok(HttpResponse::Ok().json(profile))
}

#[post("/analyze")]
async fn analyze(
    data: web::Data<HttpState>,
    _user: AuthUser,
    req: web::Json<AnalyzeRequest>,
) -> HandlerResult {
    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Analyzing text (model={})", data.app_state.llm_config.model),
    );

    let outcome = data
        .app_state
        .analyze_use_case
        .analyze_text(&data.app_state.llm_config, &req.text)
        .await
        .map_err(|e| data.fail("Analysis failed", e))?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[post("/resources")]
async fn upload_resource(
    data: web::Data<HttpState>,
    user: AuthUser,
    request: HttpRequest,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> HandlerResult {
    let user = user.0;
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let query = query.into_inner();

    let profile = data
        .app_state
        .profile_use_case
        .get(&user.user_id)
        .await
        .map_err(|e| data.fail("Loading profile failed", e))?;

    let outcome = data
        .app_state
        .upload_use_case
        .upload(
            &user,
            profile.as_ref(),
            UploadRequest {
                title: query.title,
                file_name: query.file_name.unwrap_or_else(|| "document.pdf".to_string()),
                content_type,
                bytes: body.to_vec(),
            },
        )
        .await
        .map_err(|e| data.fail("Upload failed", e))?;
    Ok(HttpResponse::Created().json(outcome))
}

#[get("/resources")]
async fn list_resources(
    data: web::Data<HttpState>,
    user: AuthUser,
    query: web::Query<SearchQuery>,
) -> HandlerResult {
    let resources = data
        .app_state
        .library_use_case
        .list(&user.0.user_id, query.q.as_deref())
        .await
        .map_err(|e| data.fail("Listing resources failed", e))?;
    Ok(HttpResponse::Ok().json(resources))
}

#[get("/resources/{id}")]
async fn get_resource(
    data: web::Data<HttpState>,
    user: AuthUser,
    path: web::Path<String>,
) -> HandlerResult {
    let resource = data
        .app_state
        .library_use_case
        .get(&user.0.user_id, &path)
        .await?;
    Ok(HttpResponse::Ok().json(resource))
}

#[get("/resources/{id}/file")]
async fn download_resource(
    data: web::Data<HttpState>,
    user: AuthUser,
    path: web::Path<String>,
) -> HandlerResult {
    let (resource, bytes) = data
        .app_state
        .library_use_case
        .read_file(&user.0.user_id, &path)
        .await?;

    let disposition = format!("inline; filename=\"{}\"", resource.file_name.replace('"', ""));
    Ok(HttpResponse::Ok()
        .content_type(PDF_CONTENT_TYPE)
        .insert_header((header::CONTENT_DISPOSITION, disposition))
        .body(bytes))
}

#[delete("/resources/{id}")]
async fn delete_resource(
    data: web::Data<HttpState>,
    user: AuthUser,
    path: web::Path<String>,
) -> HandlerResult {
    data.app_state
        .library_use_case
        .delete(&user.0.user_id, &path)
        .await
        .map_err(|e| data.fail("Deleting resource failed", e))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health)
            .service(get_logs)
            .service(get_profile)
            .service(put_profile)
            .service(analyze)
            .service(upload_resource)
            .service(list_resources)
            .service(get_resource)
            .service(download_resource)
            .service(delete_resource),
    );
}

pub fn start_server(app_state: Arc<AppState>, config: &ServerConfig) -> std::io::Result<Server> {
    let logs = app_state.logs.clone();
    let state = web::Data::new(HttpState { app_state, logs });
    let max_upload_bytes = config.max_upload_bytes;

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::analysis::test_support::{MockLLMClient, PHYSICS_REPLY};
    use crate::application::{AnalyzeUseCase, LibraryUseCase, ProfileUseCase, UploadUseCase};
    use crate::domain::llm_config::LLMConfig;
    use crate::infrastructure::db::sqlite::test_support::temp_repository;
    use crate::infrastructure::pdf::test_support::build_pdf;
    use crate::infrastructure::storage::FileStore;
    use crate::shared::activity_log::new_shared_logs;
    use actix_web::{http::StatusCode, test};

    async fn test_state() -> web::Data<HttpState> {
        let repository = Arc::new(temp_repository().await);
        let root = std::env::temp_dir().join(format!("studymate-http-{}", uuid::Uuid::new_v4()));
        let store = Arc::new(FileStore::init(root).await.unwrap());
        let analyzer = Arc::new(AnalyzeUseCase::new(Arc::new(MockLLMClient::replying(
            PHYSICS_REPLY,
        ))));
        let logs = new_shared_logs();

        let app_state = Arc::new(AppState {
            analyze_use_case: analyzer.clone(),
            upload_use_case: UploadUseCase::new(
                analyzer,
                store.clone(),
                repository.clone(),
                LLMConfig::default(),
                logs.clone(),
                1024 * 1024,
            ),
            library_use_case: LibraryUseCase::new(repository.clone(), store),
            profile_use_case: ProfileUseCase::new(repository),
            llm_config: LLMConfig::default(),
            logs: logs.clone(),
        });
        web::Data::new(HttpState { app_state, logs })
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn test_requires_user_header() {
        let app =
            test::init_service(App::new().app_data(test_state().await).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/resources").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_analyze_text() {
        let app =
            test::init_service(App::new().app_data(test_state().await).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/analyze")
            .insert_header(("X-User-Id", "u1"))
            .set_json(serde_json::json!({ "text": "Forces and motion" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["subject"], "Physics");
        assert_eq!(body["questions"][0]["correctAnswer"], "B");
        assert!(body.get("error").is_none());
    }

    #[actix_web::test]
    async fn test_blank_analyze_text_is_bad_request() {
        let app =
            test::init_service(App::new().app_data(test_state().await).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/analyze")
            .insert_header(("X-User-Id", "u1"))
            .set_json(serde_json::json!({ "text": "  " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_profile_then_upload_and_list() {
        let app =
            test::init_service(App::new().app_data(test_state().await).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/api/profile")
            .insert_header(("X-User-Id", "u1"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::put()
            .uri("/api/profile")
            .insert_header(("X-User-Id", "u1"))
            .set_json(serde_json::json!({
                "university": "BITS Pilani",
                "course": "Physics",
                "semester": "Semester 1"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let pdf = build_pdf(&["Work is the product of force and displacement along the path"]);
        let req = test::TestRequest::post()
            .uri("/api/resources?title=Work%20and%20Energy&file_name=work.pdf")
            .insert_header(("X-User-Id", "u1"))
            .insert_header((header::CONTENT_TYPE, "application/pdf"))
            .set_payload(pdf.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: serde_json::Value = test::read_body_json(resp).await;
        let id = created["resource"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/api/resources?q=kinematics")
            .insert_header(("X-User-Id", "u1"))
            .to_request();
        let listed: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["title"], "Work and Energy");

        let req = test::TestRequest::get()
            .uri(&format!("/api/resources/{}", id))
            .insert_header(("X-User-Id", "someone-else"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri(&format!("/api/resources/{}/file", id))
            .insert_header(("X-User-Id", "u1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        let downloaded = test::read_body(resp).await;
        assert_eq!(&downloaded[..], pdf.as_slice());

        let req = test::TestRequest::get()
            .uri(&format!("/api/resources/{}/file", id))
            .insert_header(("X-User-Id", "someone-else"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/resources/{}", id))
            .insert_header(("X-User-Id", "u1"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
    }
}
