//! Image records. Each row pairs with one blob keyed by its `fileName`.

use fintrack_core::pagination::PagedList;
use fintrack_db::models::image::Image;

use super::{not_persisted, recover, ServiceResult};
use crate::links::Endpoint;
use crate::middleware::auth::AuthUser;
use crate::query::ImageListParams;
use crate::response::{ApiResponse, Resource};
use crate::state::AppState;

fn resource(state: &AppState, image: Image) -> Resource<Image> {
    let links = state.links.resource_links(
        &image.id,
        Endpoint::GetImage,
        None,
        Some((Endpoint::DeleteImage, "delete-image")),
    );
    Resource { item: image, links }
}

pub async fn get(state: &AppState, id: &str) -> ApiResponse<Resource<Image>> {
    recover("get_image", get_inner(state, id).await)
}

async fn get_inner(state: &AppState, id: &str) -> ServiceResult<Resource<Image>> {
    Ok(match state.repos.images.find_by_id(id).await? {
        Some(image) => ApiResponse::ok(resource(state, image)),
        None => ApiResponse::not_found(Some("Image not found")),
    })
}

/// Removes the row, then its blob. A blob that cannot be removed is logged
/// and does not fail the call.
pub async fn delete(state: &AppState, user: &AuthUser, id: &str) -> ApiResponse<Image> {
    recover("delete_image", delete_inner(state, user, id).await)
}

async fn delete_inner(state: &AppState, user: &AuthUser, id: &str) -> ServiceResult<Image> {
    tracing::info!(image_id = id, user_id = %user.user_id, "Deleting image");

    let Some(image) = state.repos.images.find_by_id(id).await? else {
        return Ok(ApiResponse::not_found(Some("Image not found")));
    };

    if !state.repos.images.delete(id).await? {
        return Ok(not_persisted("Image"));
    }

    match state.blobs.delete_if_exists(&image.file_name).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(image_id = id, file_name = %image.file_name, "Image had no blob to delete");
        }
        Err(e) => {
            tracing::warn!(image_id = id, file_name = %image.file_name, error = %e, "Blob delete failed after image row was removed");
        }
    }

    Ok(ApiResponse::ok(image))
}

pub async fn list(
    state: &AppState,
    params: &ImageListParams,
) -> ApiResponse<PagedList<Resource<Image>>> {
    recover("list_images", list_inner(state, params).await)
}

async fn list_inner(
    state: &AppState,
    params: &ImageListParams,
) -> ServiceResult<PagedList<Resource<Image>>> {
    let request = params.page_request();
    let page = state
        .repos
        .images
        .list(&params.filter(), &request)
        .await?
        .map(|image| resource(state, image));

    let mut list = PagedList::from_page(page, &request);
    list.links = state
        .links
        .page_links(Endpoint::ListImages, &list, &request, &params.link_filters());
    Ok(ApiResponse::ok(list))
}
