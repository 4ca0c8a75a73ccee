use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;
use validator::ValidationErrors;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::category::{
    Category, CategoryChanges, CategoryDraft, CategoryWithLinks, NewCategory,
};
use crate::domain::errors::{field_error, merge_errors, messages_by_field};
use crate::domain::linker::{HeadingPlacement, relink};
use crate::domain::locale::SupportedLocales;
use crate::domain::tag_guard::{RenameDecision, TagInUse, check_rename};
use crate::domain::translation::{TranslationPatch, TranslationSet, reconcile};
use crate::domain::types::{CategoryId, CategoryTag, HeadingId, TypeConstraintError};
use crate::dto::categories::{CategoryDto, CategoryFormView, CategoryIndex, HeadingDto};
use crate::forms::categories::CategoryFormPayload;
use crate::repository::{CategoryReader, CategoryWriter, HeadingReader, PublicBodyReader};

use super::{ServiceError, ServiceResult};

pub const BLANK_TAG: &str = "Tag can't be blank";
pub const TAG_WITH_SPACES: &str = "Tag can't contain spaces";
pub const TAG_TAKEN: &str = "Tag is already taken";

/// Why a submission was not saved.
#[derive(Debug, Clone)]
pub enum Rejection {
    /// Field-level problems, shown next to the inputs.
    Validation(ValidationErrors),
    /// The tag rename was refused; shown as a single top-level message.
    TagInUse(TagInUse),
}

impl Rejection {
    /// Field errors to display on the form; empty for a refused rename.
    pub fn field_errors(&self) -> ValidationErrors {
        match self {
            Self::Validation(errors) => errors.clone(),
            Self::TagInUse(_) => ValidationErrors::new(),
        }
    }
}

/// Result of a create or update request.
#[derive(Debug, Clone)]
pub enum CategoryOutcome {
    /// Everything was written; holds the stored state.
    Saved(CategoryWithLinks),
    /// Nothing was written; `draft` holds what the admin submitted.
    Rejected {
        draft: CategoryDraft,
        reason: Rejection,
    },
}

fn ensure_access(user: &AuthenticatedUser) -> ServiceResult<()> {
    if check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

fn load_category<R>(repo: &R, id: CategoryId) -> ServiceResult<Option<CategoryWithLinks>>
where
    R: CategoryReader,
{
    let category = match repo.get_category_by_id(id) {
        Ok(Some(category)) => category,
        Ok(None) => return Ok(None),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let links = repo.list_category_links(id).map_err(|e| {
        log::error!("Failed to list links of category {id}: {e}");
        ServiceError::Internal
    })?;

    Ok(Some(CategoryWithLinks::new(category, links)))
}

/// Parses the submitted tag and checks that no other category uses it.
fn validate_tag<R>(
    raw: Option<&str>,
    own_id: Option<CategoryId>,
    repo: &R,
    errors: &mut ValidationErrors,
) -> ServiceResult<Option<CategoryTag>>
where
    R: CategoryReader,
{
    let tag = match CategoryTag::new(raw.unwrap_or_default()) {
        Ok(tag) => tag,
        Err(TypeConstraintError::ContainsWhitespace(_)) => {
            errors.add("tag", field_error("whitespace", TAG_WITH_SPACES));
            return Ok(None);
        }
        Err(_) => {
            errors.add("tag", field_error("blank", BLANK_TAG));
            return Ok(None);
        }
    };

    match repo.get_category_by_tag(&tag) {
        Ok(Some(other)) if Some(other.id) != own_id => {
            errors.add("tag", field_error("taken", TAG_TAKEN));
            Ok(None)
        }
        Ok(_) => Ok(Some(tag)),
        Err(e) => {
            log::error!("Failed to look up category tag: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Runs the linker over a submitted heading selection.
fn place_headings<R>(
    selection: &[HeadingId],
    repo: &R,
    errors: &mut ValidationErrors,
) -> ServiceResult<Option<Vec<HeadingPlacement>>>
where
    R: HeadingReader,
{
    let known: HashSet<HeadingId> = repo
        .list_headings()
        .map_err(|e| {
            log::error!("Failed to list headings: {e}");
            ServiceError::Internal
        })?
        .into_iter()
        .map(|heading| heading.id)
        .collect();

    match relink(selection, &known) {
        Ok(placements) => Ok(Some(placements)),
        Err(err) => {
            errors.add(
                "headings",
                field_error("unknown_heading", err.to_string()),
            );
            Ok(None)
        }
    }
}

fn reconcile_into(
    existing: &TranslationSet,
    submitted: &BTreeMap<String, TranslationPatch>,
    locales: &SupportedLocales,
    errors: &mut ValidationErrors,
) -> TranslationSet {
    match reconcile(existing, submitted, locales) {
        Ok(set) => set,
        Err(rejection) => {
            merge_errors(errors, rejection.errors);
            rejection.attempted
        }
    }
}

/// Lists headings with their categories plus the categories without a
/// heading, rendered in `show_locale` (or the default locale).
pub fn show_categories<R>(
    user: &AuthenticatedUser,
    repo: &R,
    locales: &SupportedLocales,
    show_locale: Option<&str>,
) -> ServiceResult<CategoryIndex>
where
    R: CategoryReader + HeadingReader,
{
    ensure_access(user)?;

    if let Some(requested) = show_locale
        && !locales.contains(requested.trim())
    {
        log::warn!("Unsupported show_locale {requested}, using the default locale");
    }
    let locale = locales.resolve(show_locale);

    let categories = repo.list_categories().map_err(|e| {
        log::error!("Failed to list categories: {e}");
        ServiceError::Internal
    })?;
    let headings = repo.list_headings().map_err(|e| {
        log::error!("Failed to list headings: {e}");
        ServiceError::Internal
    })?;
    let links = repo.list_all_links().map_err(|e| {
        log::error!("Failed to list category links: {e}");
        ServiceError::Internal
    })?;

    let headings = headings
        .into_iter()
        .map(|heading| HeadingDto {
            id: heading.id.get(),
            name: heading.name.to_string(),
            categories: categories
                .iter()
                .filter(|category| {
                    links.iter().any(|link| {
                        link.heading_id == heading.id && link.category_id == category.id
                    })
                })
                .map(|category| CategoryDto::localized(category, locale, locales))
                .collect(),
        })
        .collect();

    let without_heading = categories
        .iter()
        .filter(|category| !links.iter().any(|link| link.category_id == category.id))
        .map(|category| CategoryDto::localized(category, locale, locales))
        .collect();

    Ok(CategoryIndex {
        locale: locale.to_string(),
        locales: locales.iter().map(ToString::to_string).collect(),
        headings,
        without_heading,
    })
}

/// Form data for `draft`: the headings to choose from and, for a stored
/// category, the public bodies using its current tag.
pub fn category_form<R>(
    draft: CategoryDraft,
    errors: ValidationErrors,
    user: &AuthenticatedUser,
    repo: &R,
    locales: &SupportedLocales,
) -> ServiceResult<CategoryFormView>
where
    R: CategoryReader + HeadingReader + PublicBodyReader,
{
    ensure_access(user)?;

    let headings = repo.list_headings().map_err(|e| {
        log::error!("Failed to list headings: {e}");
        ServiceError::Internal
    })?;

    let stored = match draft.id {
        Some(id) => repo.get_category_by_id(id).map_err(|e| {
            log::error!("Failed to get category: {e}");
            ServiceError::Internal
        })?,
        None => None,
    };
    let tagged_public_bodies = match stored {
        Some(category) => repo
            .list_public_bodies_by_tag(&category.tag)
            .map_err(|e| {
                log::error!("Failed to list public bodies tagged {}: {e}", category.tag);
                ServiceError::Internal
            })?,
        None => Vec::new(),
    };

    Ok(CategoryFormView {
        draft,
        default_locale: locales.default_locale().to_string(),
        locales: locales.iter().map(ToString::to_string).collect(),
        headings,
        tagged_public_bodies,
        errors: messages_by_field(&errors),
    })
}

/// Blank form with an entry for every supported locale.
pub fn new_category<R>(
    user: &AuthenticatedUser,
    repo: &R,
    locales: &SupportedLocales,
) -> ServiceResult<CategoryFormView>
where
    R: CategoryReader + HeadingReader + PublicBodyReader,
{
    category_form(
        CategoryDraft::blank(locales),
        ValidationErrors::new(),
        user,
        repo,
        locales,
    )
}

/// Edit form for a stored category with blank entries for missing locales.
pub fn edit_category<R>(
    id: CategoryId,
    user: &AuthenticatedUser,
    repo: &R,
    locales: &SupportedLocales,
) -> ServiceResult<CategoryFormView>
where
    R: CategoryReader + HeadingReader + PublicBodyReader,
{
    ensure_access(user)?;

    let current = load_category(repo, id)?.ok_or(ServiceError::NotFound)?;
    category_form(
        CategoryDraft::from_stored(&current, locales),
        ValidationErrors::new(),
        user,
        repo,
        locales,
    )
}

/// Creates a category with its translations and heading links.
pub fn create_category<R>(
    payload: CategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    locales: &SupportedLocales,
) -> ServiceResult<CategoryOutcome>
where
    R: CategoryReader + CategoryWriter + HeadingReader,
{
    ensure_access(user)?;

    let mut errors = payload.errors.clone();
    let patches = payload.translation_patches(locales.default_locale());
    let translations = reconcile_into(&TranslationSet::new(), &patches, locales, &mut errors);
    let tag = validate_tag(payload.tag.as_deref(), None, repo, &mut errors)?;
    let placements = match &payload.headings {
        Some(selection) => place_headings(selection, repo, &mut errors)?,
        None => Some(Vec::new()),
    };

    let (Some(tag), Some(placements), true) = (tag, placements, errors.is_empty()) else {
        log::info!("Rejected new category: {errors}");
        let draft = CategoryDraft {
            id: None,
            tag: payload.tag.unwrap_or_default(),
            translations,
            heading_ids: payload.headings.unwrap_or_default(),
        };
        return Ok(CategoryOutcome::Rejected {
            draft,
            reason: Rejection::Validation(errors),
        });
    };

    let now = Utc::now().naive_utc();
    let new_category = NewCategory {
        tag,
        translations,
        created_at: now,
        updated_at: now,
    };

    let id = repo
        .create_category(&new_category, &placements)
        .map_err(|e| {
            log::error!("Failed to create category: {e}");
            ServiceError::Internal
        })?;

    let saved = load_category(repo, id)?.ok_or_else(|| {
        log::error!("Category {id} missing right after creation");
        ServiceError::Internal
    })?;
    Ok(CategoryOutcome::Saved(saved))
}

/// Updates a stored category.
///
/// A tag change is checked first: when public bodies still use the current
/// tag the whole request is refused and nothing else is applied.
pub fn update_category<R>(
    id: CategoryId,
    payload: CategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    locales: &SupportedLocales,
) -> ServiceResult<CategoryOutcome>
where
    R: CategoryReader + CategoryWriter + HeadingReader + PublicBodyReader,
{
    ensure_access(user)?;

    let current = load_category(repo, id)?.ok_or(ServiceError::NotFound)?;

    if let Some(Ok(proposed)) = payload.tag.as_deref().map(CategoryTag::new) {
        let decision = check_rename(&current.category, &proposed, |old| {
            repo.count_public_bodies_by_tag(old)
        })
        .map_err(|e| {
            log::error!("Failed to count public bodies tagged {}: {e}", current.category.tag);
            ServiceError::Internal
        })?;

        if let RenameDecision::Deny(denied) = decision {
            log::warn!(
                "Refused to rename tag {} of category {id}: used by {} public bodies",
                denied.tag,
                denied.references
            );
            return Ok(CategoryOutcome::Rejected {
                draft: CategoryDraft::from_stored(&current, locales),
                reason: Rejection::TagInUse(denied),
            });
        }
    }

    let mut errors = payload.errors.clone();
    let patches = payload.translation_patches(locales.default_locale());
    let translations = reconcile_into(
        &current.category.translations,
        &patches,
        locales,
        &mut errors,
    );
    let tag = match payload.tag.as_deref() {
        Some(raw) => validate_tag(Some(raw), Some(id), repo, &mut errors)?,
        None => Some(current.category.tag.clone()),
    };
    let placements = match &payload.headings {
        Some(selection) => place_headings(selection, repo, &mut errors)?.map(Some),
        None => Some(None),
    };

    let (Some(tag), Some(placements), true) = (tag, placements, errors.is_empty()) else {
        log::info!("Rejected update of category {id}: {errors}");
        let draft = CategoryDraft {
            id: Some(id),
            tag: payload
                .tag
                .unwrap_or_else(|| current.category.tag.to_string()),
            translations,
            heading_ids: payload
                .headings
                .unwrap_or_else(|| current.heading_ids()),
        };
        return Ok(CategoryOutcome::Rejected {
            draft,
            reason: Rejection::Validation(errors),
        });
    };

    let changes = CategoryChanges {
        id,
        tag,
        translations,
        placements,
        updated_at: Utc::now().naive_utc(),
    };

    match repo.update_category(&changes) {
        Ok(0) => return Err(ServiceError::NotFound),
        Ok(_) => {}
        Err(e) => {
            log::error!("Failed to update category: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let saved = load_category(repo, id)?.ok_or(ServiceError::NotFound)?;
    Ok(CategoryOutcome::Saved(saved))
}

/// Deletes a category, its translations and its heading links.
///
/// Public bodies may still carry the tag; their references are left dangling.
/// Deleting a category that does not exist succeeds.
pub fn destroy_category<R>(id: CategoryId, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: CategoryReader + CategoryWriter + PublicBodyReader,
{
    ensure_access(user)?;

    let stored: Option<Category> = repo.get_category_by_id(id).map_err(|e| {
        log::error!("Failed to get category: {e}");
        ServiceError::Internal
    })?;
    let Some(category) = stored else {
        log::info!("Category {id} already absent, nothing to destroy");
        return Ok(());
    };

    // The count only feeds the warning below; the delete goes ahead either way.
    match repo.count_public_bodies_by_tag(&category.tag) {
        Ok(0) => {}
        Ok(references) => log::warn!(
            "Destroying category {id} while {references} public bodies still use tag {}",
            category.tag
        ),
        Err(e) => log::warn!("Failed to count public bodies tagged {}: {e}", category.tag),
    }

    match repo.delete_category(id) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryHeadingLink;
    use crate::domain::errors::messages;
    use crate::domain::heading::Heading;
    use crate::domain::public_body::PublicBody;
    use crate::domain::translation::CategoryTranslation;
    use crate::domain::types::{DisplayOrder, HeadingName, Locale, PublicBodyId, PublicBodyName};
    use crate::forms::categories::{CategoryForm, TITLE_TOO_LONG};
    use crate::repository::test::TestRepository;
    use chrono::DateTime;

    fn sample_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".into(),
            email: "admin@example.com".into(),
            hub_id: 1,
            name: "Admin".into(),
            roles: vec![SERVICE_ACCESS_ROLE.into()],
            exp: 0,
        }
    }

    fn locales() -> SupportedLocales {
        SupportedLocales::parse("en", &["en", "es", "fr"]).unwrap()
    }

    fn heading(id: i32) -> Heading {
        Heading {
            id: HeadingId::new(id).unwrap(),
            name: HeadingName::new(format!("Heading {id}")).unwrap(),
            display_order: DisplayOrder::new(id).unwrap(),
        }
    }

    fn public_body(id: i32, tags: &[&str]) -> PublicBody {
        PublicBody {
            id: PublicBodyId::new(id).unwrap(),
            name: PublicBodyName::new(format!("Body {id}")).unwrap(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn sample_category(id: i32, tag: &str) -> Category {
        let translations = [
            (
                Locale::new("en").unwrap(),
                CategoryTranslation::new("Example Category", "Example description"),
            ),
            (
                Locale::new("es").unwrap(),
                CategoryTranslation::new("Los category", "Descripción"),
            ),
        ]
        .into_iter()
        .collect();

        Category {
            id: CategoryId::new(id).unwrap(),
            tag: CategoryTag::new(tag).unwrap(),
            translations,
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
            updated_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn link(category: i32, heading: i32, order: i32) -> CategoryHeadingLink {
        CategoryHeadingLink {
            category_id: CategoryId::new(category).unwrap(),
            heading_id: HeadingId::new(heading).unwrap(),
            display_order: DisplayOrder::new(order).unwrap(),
        }
    }

    fn id(value: i32) -> CategoryId {
        CategoryId::new(value).unwrap()
    }

    fn heading_ids(ids: &[i32]) -> Vec<HeadingId> {
        ids.iter().map(|i| HeadingId::new(*i).unwrap()).collect()
    }

    /// Category 1 tagged `council`, linked to heading 1, with two public bodies
    /// using the tag; category 2 tagged `empty` with no references.
    fn seeded_repo() -> TestRepository {
        TestRepository::new(
            vec![heading(1), heading(2), heading(3)],
            vec![
                public_body(1, &["council"]),
                public_body(2, &["council", "other"]),
                public_body(3, &["wont_be_found"]),
            ],
        )
        .with_categories(vec![sample_category(1, "council"), sample_category(2, "empty")])
        .with_links(vec![link(1, 1, 0)])
    }

    fn saved(outcome: CategoryOutcome) -> CategoryWithLinks {
        match outcome {
            CategoryOutcome::Saved(saved) => saved,
            CategoryOutcome::Rejected { reason, .. } => panic!("unexpected rejection: {reason:?}"),
        }
    }

    fn rejected(outcome: CategoryOutcome) -> (CategoryDraft, Rejection) {
        match outcome {
            CategoryOutcome::Rejected { draft, reason } => (draft, reason),
            CategoryOutcome::Saved(saved) => panic!("unexpected save: {saved:?}"),
        }
    }

    #[test]
    fn creates_category_in_one_locale_with_blank_entries_for_the_rest() {
        let repo = seeded_repo();
        let payload = CategoryFormPayload {
            title: Some("New Category".into()),
            description: Some("New category for testing stuff".into()),
            tag: Some("new_test_category".into()),
            ..CategoryFormPayload::default()
        };

        let created = saved(create_category(payload, &sample_user(), &repo, &locales()).unwrap());

        assert_eq!(repo.category_count(), 3);
        let translations = &created.category.translations;
        assert_eq!(translations.get("en").unwrap().title, "New Category");
        assert_eq!(translations.get("es").unwrap(), &CategoryTranslation::blank());
        assert_eq!(translations.get("fr").unwrap(), &CategoryTranslation::blank());
        assert!(created.links.is_empty());
    }

    #[test]
    fn creates_category_with_multiple_locales() {
        let repo = seeded_repo();
        let mut payload = CategoryFormPayload {
            title: Some("New Category".into()),
            description: Some("New category for testing stuff".into()),
            tag: Some("new_test_category".into()),
            ..CategoryFormPayload::default()
        };
        payload
            .translations
            .insert("es".into(), TranslationPatch::title("Mi Nuevo Category"));

        let created = saved(create_category(payload, &sample_user(), &repo, &locales()).unwrap());

        let es = Locale::new("es").unwrap();
        assert_eq!(
            created.category.translation(&es, &locales()).unwrap().title,
            "Mi Nuevo Category"
        );
    }

    #[test]
    fn creates_heading_associations() {
        let repo = seeded_repo();
        let payload = CategoryFormPayload {
            title: Some("With headings".into()),
            description: Some("-".into()),
            tag: Some("with_headings".into()),
            headings: Some(heading_ids(&[3, 2])),
            ..CategoryFormPayload::default()
        };

        let created = saved(create_category(payload, &sample_user(), &repo, &locales()).unwrap());

        assert_eq!(created.heading_ids(), heading_ids(&[3, 2]));
    }

    #[test]
    fn failed_create_does_not_persist() {
        let repo = seeded_repo();
        let payload = CategoryFormPayload {
            title: Some(String::new()),
            ..CategoryFormPayload::default()
        };

        let (draft, reason) =
            rejected(create_category(payload, &sample_user(), &repo, &locales()).unwrap());

        assert_eq!(repo.category_count(), 2);
        let Rejection::Validation(errors) = reason else {
            panic!("expected validation errors");
        };
        assert!(errors.errors().contains_key("title"));
        assert!(errors.errors().contains_key("tag"));
        assert!(draft.translations.covers(&locales()));
    }

    #[test]
    fn create_rejects_duplicate_tags_and_keeps_the_attempt() {
        let repo = seeded_repo();
        let payload = CategoryFormPayload {
            title: Some("Duplicate".into()),
            description: Some("-".into()),
            tag: Some("council".into()),
            ..CategoryFormPayload::default()
        };

        let (draft, reason) =
            rejected(create_category(payload, &sample_user(), &repo, &locales()).unwrap());

        assert_eq!(messages(&reason.field_errors(), "tag"), vec![TAG_TAKEN.to_string()]);
        assert_eq!(draft.tag, "council");
        assert_eq!(draft.translations.get("en").unwrap().title, "Duplicate");
        assert_eq!(repo.category_count(), 2);
    }

    #[test]
    fn create_rejects_unknown_headings_and_locales() {
        let repo = seeded_repo();
        let mut payload = CategoryFormPayload {
            title: Some("Unknown".into()),
            description: Some("-".into()),
            tag: Some("unknown".into()),
            headings: Some(heading_ids(&[2, 99])),
            ..CategoryFormPayload::default()
        };
        payload
            .translations
            .insert("de".into(), TranslationPatch::title("Kategorie"));

        let (draft, reason) =
            rejected(create_category(payload, &sample_user(), &repo, &locales()).unwrap());

        let errors = reason.field_errors();
        assert_eq!(
            messages(&errors, "headings"),
            vec!["unknown headings: 99".to_string()]
        );
        assert_eq!(
            messages(&errors, "translations"),
            vec!["unsupported locale: de".to_string()]
        );
        assert_eq!(draft.heading_ids, heading_ids(&[2, 99]));
        assert_eq!(repo.category_count(), 2);
    }

    #[test]
    fn create_rejects_tags_with_spaces() {
        let repo = seeded_repo();
        let payload = CategoryFormPayload {
            title: Some("Spaced".into()),
            description: Some("-".into()),
            tag: Some("bad tag".into()),
            ..CategoryFormPayload::default()
        };

        let (draft, reason) =
            rejected(create_category(payload, &sample_user(), &repo, &locales()).unwrap());

        assert_eq!(
            messages(&reason.field_errors(), "tag"),
            vec![TAG_WITH_SPACES.to_string()]
        );
        assert_eq!(draft.tag, "bad tag");
        assert_eq!(repo.category_count(), 2);
    }

    #[test]
    fn malformed_tag_on_a_referenced_category_skips_the_guard_but_blocks_the_write() {
        let repo = seeded_repo();

        for raw in ["   ", "a b"] {
            let payload = CategoryFormPayload {
                title: Some("Renamed".into()),
                tag: Some(raw.into()),
                ..CategoryFormPayload::default()
            };

            let (draft, reason) = rejected(
                update_category(id(1), payload, &sample_user(), &repo, &locales()).unwrap(),
            );

            let Rejection::Validation(errors) = reason else {
                panic!("expected a field error instead of a refused rename");
            };
            assert_eq!(messages(&errors, "tag").len(), 1);
            assert_eq!(draft.tag, raw);
        }

        let stored = repo.get_category_by_id(id(1)).unwrap().unwrap();
        assert_eq!(stored.tag, "council");
        assert_eq!(stored.translations.get("en").unwrap().title, "Example Category");
    }

    #[test]
    fn invalid_heading_tokens_rerender_the_submission() {
        let repo = seeded_repo();
        let form = CategoryForm::from_pairs(
            [
                ("title", "Typed title"),
                ("description", "Typed description"),
                ("category_tag", "typed"),
                ("headings[h1]", "2"),
                ("headings[h2]", "abc"),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        )
        .unwrap();
        let payload: CategoryFormPayload = form.try_into().unwrap();

        let (draft, reason) =
            rejected(create_category(payload, &sample_user(), &repo, &locales()).unwrap());

        assert_eq!(
            messages(&reason.field_errors(), "headings"),
            vec!["unknown headings: abc".to_string()]
        );
        assert_eq!(draft.tag, "typed");
        assert_eq!(draft.translations.get("en").unwrap().title, "Typed title");
        assert_eq!(draft.heading_ids, heading_ids(&[2]));
        assert_eq!(repo.category_count(), 2);
    }

    #[test]
    fn overlong_title_blocks_an_update() {
        let repo = seeded_repo();
        let form = CategoryForm {
            title: Some("t".repeat(256)),
            ..CategoryForm::default()
        };
        let payload: CategoryFormPayload = form.try_into().unwrap();

        let (draft, reason) =
            rejected(update_category(id(2), payload, &sample_user(), &repo, &locales()).unwrap());

        assert_eq!(
            messages(&reason.field_errors(), "title"),
            vec![TITLE_TOO_LONG.to_string()]
        );
        assert_eq!(draft.translations.get("en").unwrap().title.len(), 256);
        let stored = repo.get_category_by_id(id(2)).unwrap().unwrap();
        assert_eq!(stored.translations.get("en").unwrap().title, "Example Category");
    }

    #[test]
    fn updates_title_in_default_locale() {
        let repo = seeded_repo();
        let payload = CategoryFormPayload {
            title: Some("Renamed".into()),
            ..CategoryFormPayload::default()
        };

        let updated =
            saved(update_category(id(1), payload, &sample_user(), &repo, &locales()).unwrap());

        assert_eq!(updated.category.translations.get("en").unwrap().title, "Renamed");
        assert_eq!(
            updated.category.translations.get("es").unwrap().title,
            "Los category"
        );
        assert!(updated.category.translations.covers(&locales()));
    }

    #[test]
    fn updating_another_locale_preserves_the_default_one() {
        let repo = seeded_repo();
        let before = repo.get_category_by_id(id(1)).unwrap().unwrap();
        let mut payload = CategoryFormPayload::default();
        payload
            .translations
            .insert("es".into(), TranslationPatch::title("Renamed"));

        let updated =
            saved(update_category(id(1), payload, &sample_user(), &repo, &locales()).unwrap());

        assert_eq!(
            updated.category.translations.get("en"),
            before.translations.get("en")
        );
        assert_eq!(updated.category.translations.get("es").unwrap().title, "Renamed");
    }

    #[test]
    fn updates_an_existing_translation_and_adds_a_third() {
        let repo = seeded_repo();
        let mut payload = CategoryFormPayload::default();
        payload.translations.insert(
            "es".into(),
            TranslationPatch::full("Renamed Example ES", "desc"),
        );
        payload
            .translations
            .insert("fr".into(), TranslationPatch::full("Example FR", "desc"));

        let updated =
            saved(update_category(id(1), payload, &sample_user(), &repo, &locales()).unwrap());

        let translations = &updated.category.translations;
        assert_eq!(translations.get("es").unwrap().title, "Renamed Example ES");
        assert_eq!(translations.get("fr").unwrap().title, "Example FR");
    }

    #[test]
    fn replaces_heading_associations_wholesale() {
        let repo = seeded_repo();
        let payload = CategoryFormPayload {
            title: Some("Renamed".into()),
            headings: Some(heading_ids(&[2])),
            ..CategoryFormPayload::default()
        };

        let updated =
            saved(update_category(id(1), payload, &sample_user(), &repo, &locales()).unwrap());

        assert_eq!(updated.heading_ids(), heading_ids(&[2]));
    }

    #[test]
    fn missing_heading_field_leaves_links_untouched() {
        let repo = seeded_repo();
        let payload = CategoryFormPayload {
            title: Some("Renamed".into()),
            ..CategoryFormPayload::default()
        };

        let updated =
            saved(update_category(id(1), payload, &sample_user(), &repo, &locales()).unwrap());

        assert_eq!(updated.heading_ids(), heading_ids(&[1]));
    }

    #[test]
    fn empty_heading_selection_clears_links() {
        let repo = seeded_repo();
        let payload = CategoryFormPayload {
            headings: Some(Vec::new()),
            ..CategoryFormPayload::default()
        };

        let updated =
            saved(update_category(id(1), payload, &sample_user(), &repo, &locales()).unwrap());

        assert!(updated.links.is_empty());
    }

    #[test]
    fn refuses_to_rename_a_tag_in_use() {
        let repo = seeded_repo();
        let payload = CategoryFormPayload {
            title: Some("Also renamed".into()),
            tag: Some("renamed".into()),
            headings: Some(heading_ids(&[2])),
            ..CategoryFormPayload::default()
        };

        let (_, reason) =
            rejected(update_category(id(1), payload, &sample_user(), &repo, &locales()).unwrap());

        let Rejection::TagInUse(denied) = reason else {
            panic!("expected the tag guard to refuse the rename");
        };
        assert_eq!(denied.references, 2);

        let stored = load_category(&repo, id(1)).unwrap().unwrap();
        assert_eq!(stored.category.tag, "council");
        assert_eq!(
            stored.category.translations.get("en").unwrap().title,
            "Example Category"
        );
        assert_eq!(stored.heading_ids(), heading_ids(&[1]));
    }

    #[test]
    fn keeping_the_same_tag_always_succeeds() {
        let repo = seeded_repo();
        let payload = CategoryFormPayload {
            tag: Some("council".into()),
            ..CategoryFormPayload::default()
        };

        let updated =
            saved(update_category(id(1), payload, &sample_user(), &repo, &locales()).unwrap());

        assert_eq!(updated.category.tag, "council");
    }

    #[test]
    fn renames_a_tag_without_references() {
        let repo = seeded_repo();
        let payload = CategoryFormPayload {
            tag: Some("renamed".into()),
            ..CategoryFormPayload::default()
        };

        let updated =
            saved(update_category(id(2), payload, &sample_user(), &repo, &locales()).unwrap());

        assert_eq!(updated.category.tag, "renamed");
        assert_eq!(
            repo.get_category_by_id(id(2)).unwrap().unwrap().tag,
            "renamed"
        );
    }

    #[test]
    fn rename_to_a_taken_tag_is_a_field_error() {
        let repo = seeded_repo();
        let payload = CategoryFormPayload {
            tag: Some("council".into()),
            ..CategoryFormPayload::default()
        };

        let (_, reason) =
            rejected(update_category(id(2), payload, &sample_user(), &repo, &locales()).unwrap());

        assert_eq!(messages(&reason.field_errors(), "tag"), vec![TAG_TAKEN.to_string()]);
    }

    #[test]
    fn blank_title_rerenders_with_attempted_values() {
        let repo = seeded_repo();
        let payload = CategoryFormPayload {
            title: Some(String::new()),
            ..CategoryFormPayload::default()
        };

        let (draft, reason) =
            rejected(update_category(id(1), payload, &sample_user(), &repo, &locales()).unwrap());

        assert!(reason.field_errors().errors().contains_key("title"));
        assert_eq!(draft.translations.get("en").unwrap().title, "");
        assert_eq!(draft.heading_ids, heading_ids(&[1]));
        let stored = repo.get_category_by_id(id(1)).unwrap().unwrap();
        assert_eq!(stored.translations.get("en").unwrap().title, "Example Category");
    }

    #[test]
    fn updating_a_missing_category_is_not_found() {
        let repo = seeded_repo();

        let err = update_category(
            id(42),
            CategoryFormPayload::default(),
            &sample_user(),
            &repo,
            &locales(),
        )
        .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound));
    }

    #[test]
    fn destroys_categories_still_referenced_by_public_bodies() {
        let repo = seeded_repo();

        destroy_category(id(1), &sample_user(), &repo).unwrap();

        assert_eq!(repo.category_count(), 1);
        assert!(repo.list_category_links(id(1)).unwrap().is_empty());
    }

    #[test]
    fn destroy_goes_ahead_when_references_cannot_be_counted() {
        let repo = seeded_repo().with_failing_public_body_counts();

        destroy_category(id(1), &sample_user(), &repo).unwrap();

        assert_eq!(repo.category_count(), 1);
        assert!(repo.get_category_by_id(id(1)).unwrap().is_none());
    }

    #[test]
    fn destroying_a_missing_category_succeeds() {
        let repo = seeded_repo();

        destroy_category(id(42), &sample_user(), &repo).unwrap();

        assert_eq!(repo.category_count(), 2);
    }

    #[test]
    fn requires_admin_role() {
        let repo = seeded_repo();
        let mut user = sample_user();
        user.roles.clear();

        let err = destroy_category(id(1), &user, &repo).unwrap_err();

        assert!(matches!(err, ServiceError::Unauthorized));
        assert_eq!(repo.category_count(), 2);
    }

    #[test]
    fn index_groups_categories_by_heading() {
        let repo = seeded_repo();

        let index = show_categories(&sample_user(), &repo, &locales(), None).unwrap();

        assert_eq!(index.locale, "en");
        assert_eq!(index.headings.len(), 3);
        assert_eq!(index.headings[0].categories[0].tag, "council");
        assert!(index.headings[1].categories.is_empty());
        let without: Vec<&str> = index.without_heading.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(without, vec!["empty"]);
    }

    #[test]
    fn index_uses_the_requested_locale() {
        let repo = seeded_repo();

        let index = show_categories(&sample_user(), &repo, &locales(), Some("es")).unwrap();

        assert_eq!(index.locale, "es");
        assert_eq!(index.without_heading[0].title, "Los category");
        assert!(!index.without_heading[0].complete);
    }

    #[test]
    fn unsupported_index_locale_falls_back_to_the_default() {
        let repo = seeded_repo();

        let index = show_categories(&sample_user(), &repo, &locales(), Some("de")).unwrap();

        assert_eq!(index.locale, "en");
        assert_eq!(index.without_heading[0].title, "Example Category");
    }

    #[test]
    fn new_form_has_entries_for_all_locales() {
        let repo = seeded_repo();

        let view = new_category(&sample_user(), &repo, &locales()).unwrap();

        let codes: Vec<&str> = view.draft.translations.locales().map(Locale::as_str).collect();
        assert_eq!(codes, vec!["en", "es", "fr"]);
        assert_eq!(view.draft.id, None);
        assert_eq!(view.headings.len(), 3);
    }

    #[test]
    fn edit_form_builds_missing_locales_and_lists_tagged_bodies() {
        let repo = seeded_repo();

        let view = edit_category(id(1), &sample_user(), &repo, &locales()).unwrap();

        assert!(view.draft.translations.contains("fr"));
        let bodies: Vec<i32> = view
            .tagged_public_bodies
            .iter()
            .map(|b| b.id.get())
            .collect();
        assert_eq!(bodies, vec![1, 2]);
        assert_eq!(view.draft.heading_ids, heading_ids(&[1]));
    }
}
