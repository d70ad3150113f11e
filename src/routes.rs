use std::sync::Arc;

use axum::{
    Router,
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::{
    AppState,
    error::{AppError, AppResult, DataError},
    flash::{self, Level},
    models::{AddMovieForm, AddUserForm, NewMovie, NewUser, UpdateMovieForm},
    templates,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/users", get(list_users))
        .route("/users/{user_id}", get(user_movies))
        .route("/add_user", get(add_user_form).post(add_user))
        .route("/add_movie/{user_id}", get(add_movie_form).post(add_movie))
        .route(
            "/users/{user_id}/update_movie/{movie_id}",
            get(update_movie_form).post(update_movie),
        )
        .route("/users/{user_id}/delete_movie/{movie_id}", post(delete_movie))
        .fallback(not_found)
        .with_state(state)
}

pub async fn home(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, flash) = flash::take(jar);
    (jar, Html(templates::home_page(flash.as_ref())))
}

pub async fn list_users(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    match state.data.list_users().await {
        Ok(users) => {
            let (jar, flash) = flash::take(jar);
            (jar, Html(templates::users_page(&users, flash.as_ref()))).into_response()
        },
        Err(_) => {
            let jar = flash::push(jar, Level::Danger, "An error occurred while loading users.");
            (jar, Redirect::to("/")).into_response()
        },
    }
}

pub async fn user_movies(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    jar: CookieJar,
) -> AppResult<Response> {
    let result = async {
        let user = state.data.get_user(user_id).await?;
        let movies = state.data.list_movies_for_user(user_id).await?;
        Ok::<_, DataError>((user, movies))
    }
    .await;

    match result {
        Ok((user, movies)) => {
            let (jar, flash) = flash::take(jar);
            Ok((jar, Html(templates::user_movies_page(&user, &movies, flash.as_ref())))
                .into_response())
        },
        Err(err) if err.is_not_found() => Err(err.into()),
        Err(_) => {
            let jar =
                flash::push(jar, Level::Danger, "An error occurred while loading user's movies.");
            Ok((jar, Redirect::to("/users")).into_response())
        },
    }
}

pub async fn add_user_form() -> Html<String> {
    Html(templates::add_user_page("", None))
}

pub async fn add_user(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<AddUserForm>,
) -> Response {
    let name = form.name.trim().to_string();
    if name.is_empty() {
        let body = templates::add_user_page("", Some("Please enter a name."));
        return (StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response();
    }

    match state.data.add_user(NewUser { name: name.clone() }).await {
        Ok(_) => {
            let jar = flash::push(jar, Level::Success, "User added successfully.");
            (jar, Redirect::to("/users")).into_response()
        },
        Err(_) => {
            Html(templates::add_user_page(&name, Some("Failed to add user."))).into_response()
        },
    }
}

pub async fn add_movie_form(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> AppResult<Html<String>> {
    let user = state.data.get_user(user_id).await?;
    Ok(Html(templates::add_movie_page(&user, "", None)))
}

pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    jar: CookieJar,
    Form(form): Form<AddMovieForm>,
) -> AppResult<Response> {
    let user = state.data.get_user(user_id).await?;
    let title = form.title.trim().to_string();

    let error = if title.is_empty() {
        "Please enter a movie title.".to_string()
    } else {
        match state.omdb.fetch_movie(&title).await {
            None => format!("Movie '{title}' not found in OMDb."),
            Some(meta) => {
                let movie = NewMovie::from_metadata(user.id, meta);
                match state.data.add_movie(movie).await {
                    Ok(_) => {
                        let jar = flash::push(jar, Level::Success, "Movie added successfully.");
                        let to = format!("/users/{}", user.id);
                        return Ok((jar, Redirect::to(&to)).into_response());
                    },
                    Err(_) => "An error occurred while saving the movie.".to_string(),
                }
            },
        }
    };

    Ok(Html(templates::add_movie_page(&user, &title, Some(&error))).into_response())
}

pub async fn update_movie_form(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
) -> AppResult<Response> {
    let movie = state.data.get_movie(movie_id).await?;
    if movie.user_id != user_id {
        return Ok(not_found().await.into_response());
    }
    let form = UpdateMovieForm::from_movie(&movie);
    Ok(Html(templates::update_movie_page(user_id, movie_id, &form, None)).into_response())
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
    jar: CookieJar,
    Form(form): Form<UpdateMovieForm>,
) -> AppResult<Response> {
    let movie = state.data.get_movie(movie_id).await?;
    if movie.user_id != user_id {
        return Ok(not_found().await.into_response());
    }

    let Some(update) = form.to_update(movie_id) else {
        warn!(movie_id, "rejected movie update with invalid fields");
        let body =
            templates::update_movie_page(user_id, movie_id, &form, Some("Failed to update movie."));
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response());
    };

    match state.data.update_movie(update).await {
        Ok(_) => {
            let jar = flash::push(jar, Level::Success, "Movie updated successfully.");
            Ok((jar, Redirect::to(&format!("/users/{user_id}"))).into_response())
        },
        Err(err) if err.is_not_found() => Err(AppError::from(err)),
        Err(_) => {
            let body = templates::update_movie_page(
                user_id,
                movie_id,
                &form,
                Some("Failed to update movie."),
            );
            Ok(Html(body).into_response())
        },
    }
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i32, i32)>,
    jar: CookieJar,
) -> AppResult<Response> {
    let movie = state.data.get_movie(movie_id).await?;
    if movie.user_id != user_id {
        return Ok(not_found().await.into_response());
    }

    let jar = match state.data.delete_movie(movie_id).await {
        Ok(()) => flash::push(jar, Level::Success, "Movie deleted successfully."),
        Err(err) if err.is_not_found() => return Err(err.into()),
        Err(_) => flash::push(jar, Level::Danger, "Failed to delete movie."),
    };
    Ok((jar, Redirect::to(&format!("/users/{user_id}"))).into_response())
}

pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(templates::not_found_page()))
}
