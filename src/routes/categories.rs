use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use serde::Deserialize;
use tera::Tera;
use validator::ValidationErrors;

use crate::domain::category::CategoryDraft;
use crate::domain::locale::SupportedLocales;
use crate::domain::types::CategoryId;
use crate::forms::categories::{CategoryForm, CategoryFormPayload};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::categories::{
    CategoryOutcome, Rejection, category_form, create_category as create_category_service,
    destroy_category as destroy_category_service, edit_category as edit_category_service,
    new_category as new_category_service, show_categories as show_categories_service,
    update_category as update_category_service,
};

const INDEX_URL: &str = "/admin/categories";

fn edit_url(id: CategoryId) -> String {
    format!("{INDEX_URL}/{id}/edit")
}

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub show_locale: Option<String>,
}

fn decode_form(pairs: Vec<(String, String)>) -> Result<CategoryFormPayload, ServiceError> {
    let payload = CategoryForm::from_pairs(pairs).and_then(CategoryFormPayload::try_from)?;
    Ok(payload)
}

fn parse_id(raw: i32) -> Result<CategoryId, ServiceError> {
    Ok(CategoryId::new(raw)?)
}

/// Renders a new/edit form for `draft`, used both for fresh forms and for
/// rejected submissions.
#[allow(clippy::too_many_arguments)]
fn render_form(
    template: &str,
    draft: CategoryDraft,
    errors: ValidationErrors,
    user: &AuthenticatedUser,
    flash_messages: &IncomingFlashMessages,
    repo: &DieselRepository,
    locales: &SupportedLocales,
    server_config: &CommonServerConfig,
    tera: &Tera,
) -> HttpResponse {
    match category_form(draft, errors, user, repo, locales) {
        Ok(view) => {
            let mut context =
                base_context(flash_messages, user, "categories", &server_config.auth_service_url);
            context.insert("form", &view);
            render_template(tera, template, &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render category form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/categories")]
pub async fn show_categories(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    query: web::Query<IndexQuery>,
    repo: web::Data<DieselRepository>,
    locales: web::Data<SupportedLocales>,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let show_locale = query.show_locale.as_deref();

    match show_categories_service(&user, repo.get_ref(), locales.get_ref(), show_locale) {
        Ok(index) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "categories",
                &server_config.auth_service_url,
            );
            context.insert("index", &index);
            render_template(&tera, "categories/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render categories page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/categories/new")]
pub async fn new_category(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    locales: web::Data<SupportedLocales>,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match new_category_service(&user, repo.get_ref(), locales.get_ref()) {
        Ok(view) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "categories",
                &server_config.auth_service_url,
            );
            context.insert("form", &view);
            render_template(&tera, "categories/new.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render new category form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/categories")]
pub async fn create_category(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    locales: web::Data<SupportedLocales>,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
    web::Form(pairs): web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let payload = match decode_form(pairs) {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&format!("{INDEX_URL}/new"));
        }
    };

    match create_category_service(payload, &user, repo.get_ref(), locales.get_ref()) {
        Ok(CategoryOutcome::Saved(_)) => {
            FlashMessage::success("Category was successfully created.").send();
            redirect(INDEX_URL)
        }
        Ok(CategoryOutcome::Rejected { draft, reason }) => render_form(
            "categories/new.html",
            draft,
            reason.field_errors(),
            &user,
            &flash_messages,
            repo.get_ref(),
            locales.get_ref(),
            server_config.get_ref(),
            &tera,
        ),
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("{INDEX_URL}/new"))
        }
        Err(err) => {
            log::error!("Failed to create category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/categories/{category_id}/edit")]
pub async fn edit_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    locales: web::Data<SupportedLocales>,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let category_id = match parse_id(category_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    match edit_category_service(category_id, &user, repo.get_ref(), locales.get_ref()) {
        Ok(view) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "categories",
                &server_config.auth_service_url,
            );
            context.insert("form", &view);
            render_template(&tera, "categories/edit.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render edit category form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/categories/{category_id}")]
pub async fn update_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    locales: web::Data<SupportedLocales>,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
    web::Form(pairs): web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let category_id = match parse_id(category_id.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::NotFound().finish(),
    };

    let payload = match decode_form(pairs) {
        Ok(payload) => payload,
        Err(err) => {
            FlashMessage::error(err.to_string()).send();
            return redirect(&edit_url(category_id));
        }
    };

    match update_category_service(
        category_id,
        payload,
        &user,
        repo.get_ref(),
        locales.get_ref(),
    ) {
        Ok(CategoryOutcome::Saved(_)) => {
            FlashMessage::success("Category was successfully updated.").send();
            redirect(&edit_url(category_id))
        }
        Ok(CategoryOutcome::Rejected {
            reason: Rejection::TagInUse(denied),
            ..
        }) => {
            FlashMessage::error(denied.to_string()).send();
            redirect(&edit_url(category_id))
        }
        Ok(CategoryOutcome::Rejected { draft, reason }) => render_form(
            "categories/edit.html",
            draft,
            reason.field_errors(),
            &user,
            &flash_messages,
            repo.get_ref(),
            locales.get_ref(),
            server_config.get_ref(),
            &tera,
        ),
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&edit_url(category_id))
        }
        Err(err) => {
            log::error!("Failed to update category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/categories/{category_id}/delete")]
pub async fn destroy_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let category_id = match parse_id(category_id.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(INDEX_URL);
        }
    };

    match destroy_category_service(category_id, &user, repo.get_ref()) {
        Ok(()) => FlashMessage::success("Category was successfully destroyed.").send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(err) => {
            log::error!("Failed to destroy category: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect(INDEX_URL)
}
