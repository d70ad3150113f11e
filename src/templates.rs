use maud::{DOCTYPE, Markup, html};

use crate::{
    flash::{Flash, Level},
    models::{Movie, UpdateMovieForm, User},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";
const BUTTON_CLASS: &str =
    "w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700";
const LINK_CLASS: &str = "text-sm text-blue-600 hover:text-blue-800";

pub fn home_page(flash: Option<&Flash>) -> String {
    page(
        "MovieDex",
        flash,
        html! {
            div class="bg-white shadow rounded-lg p-8" {
                h1 class="text-3xl font-bold text-gray-900" { "Welcome to the Movie Database" }
                p class="mt-2 text-gray-600" { "Keep a personal list of movies for everyone in the house." }
                div class="mt-8 flex gap-6" {
                    a class=(LINK_CLASS) href="/users" { "Browse users" }
                    a class=(LINK_CLASS) href="/add_user" { "Add a user" }
                }
            }
        },
    )
}

pub fn users_page(users: &[User], flash: Option<&Flash>) -> String {
    page(
        "Users",
        flash,
        html! {
            div class="flex items-start justify-between gap-6" {
                h1 class="text-3xl font-bold text-gray-900" { "Users" }
                a class=(LINK_CLASS) href="/add_user" { "Add user" }
            }
            @if users.is_empty() {
                div class="mt-8 bg-white shadow rounded-lg p-8" {
                    p class="text-gray-600" { "No users yet." }
                }
            } @else {
                ul class="mt-8 bg-white shadow rounded-lg divide-y divide-gray-100" {
                    @for user in users {
                        li class="px-6 py-4" {
                            a class="font-medium text-gray-900 hover:text-blue-700" href=(format!("/users/{}", user.id)) { (user.name) }
                        }
                    }
                }
            }
        },
    )
}

pub fn user_movies_page(user: &User, movies: &[Movie], flash: Option<&Flash>) -> String {
    page(
        &format!("{}'s movies", user.name),
        flash,
        html! {
            div class="flex items-start justify-between gap-6" {
                div {
                    h1 class="text-3xl font-bold text-gray-900" { (user.name) "'s movies" }
                    a class=(LINK_CLASS) href="/users" { "All users" }
                }
                a class=(LINK_CLASS) href=(format!("/add_movie/{}", user.id)) { "Add movie" }
            }
            @if movies.is_empty() {
                div class="mt-8 bg-white shadow rounded-lg p-8" {
                    p class="text-gray-600" { "No movies in this collection yet." }
                }
            } @else {
                div class="mt-8 space-y-4" {
                    @for movie in movies {
                        (movie_card(user.id, movie))
                    }
                }
            }
        },
    )
}

pub fn add_user_page(name: &str, error: Option<&str>) -> String {
    page(
        "Add user",
        None,
        html! {
            div class="bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { "Add user" }
                (form_error(error))
                form class="mt-6 space-y-6" method="post" action="/add_user" {
                    div {
                        label class="block text-sm font-medium text-gray-700" for="name" { "Name" }
                        input class=(INPUT_CLASS) name="name" id="name" value=(name) maxlength="100" required;
                    }
                    button class=(BUTTON_CLASS) type="submit" { "Add user" }
                }
                a class=(LINK_CLASS) href="/users" { "Back" }
            }
        },
    )
}

pub fn add_movie_page(user: &User, title: &str, error: Option<&str>) -> String {
    page(
        "Add movie",
        None,
        html! {
            div class="bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { "Add a movie for " (user.name) }
                p class="mt-2 text-gray-600" { "Details are looked up on OMDb by title." }
                (form_error(error))
                form class="mt-6 space-y-6" method="post" action=(format!("/add_movie/{}", user.id)) {
                    div {
                        label class="block text-sm font-medium text-gray-700" for="title" { "Title" }
                        input class=(INPUT_CLASS) name="title" id="title" value=(title) required;
                    }
                    button class=(BUTTON_CLASS) type="submit" { "Search and add" }
                }
                a class=(LINK_CLASS) href=(format!("/users/{}", user.id)) { "Back" }
            }
        },
    )
}

pub fn update_movie_page(
    user_id: i32,
    movie_id: i32,
    form: &UpdateMovieForm,
    error: Option<&str>,
) -> String {
    page(
        "Update movie",
        None,
        html! {
            div class="bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { "Update movie" }
                (form_error(error))
                form class="mt-6 space-y-6" method="post" action=(format!("/users/{user_id}/update_movie/{movie_id}")) {
                    div {
                        label class="block text-sm font-medium text-gray-700" for="name" { "Title" }
                        input class=(INPUT_CLASS) name="name" id="name" value=(form.name) maxlength="100" required;
                    }
                    div {
                        label class="block text-sm font-medium text-gray-700" for="director" { "Director" }
                        input class=(INPUT_CLASS) name="director" id="director" value=(form.director) maxlength="100";
                    }
                    div class="grid gap-4 md:grid-cols-2" {
                        div {
                            label class="block text-sm font-medium text-gray-700" for="year" { "Year" }
                            input class=(INPUT_CLASS) name="year" id="year" value=(form.year) inputmode="numeric";
                        }
                        div {
                            label class="block text-sm font-medium text-gray-700" for="rating" { "Rating" }
                            input class=(INPUT_CLASS) name="rating" id="rating" value=(form.rating) inputmode="decimal";
                        }
                    }
                    button class=(BUTTON_CLASS) type="submit" { "Save" }
                }
                a class=(LINK_CLASS) href=(format!("/users/{user_id}")) { "Back" }
            }
        },
    )
}

pub fn not_found_page() -> String {
    message_page("Not found", "The page or record you asked for does not exist.")
}

pub fn error_page(message: &str) -> String {
    message_page("Error", message)
}

fn message_page(heading: &str, message: &str) -> String {
    page(
        heading,
        None,
        html! {
            div class="bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { (heading) }
                p class="mt-4 text-gray-700" { (message) }
                a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/users" { "Back to users" }
            }
        },
    )
}

fn page(title: &str, flash: Option<&Flash>, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body class="min-h-screen bg-gray-50" {
                div class="max-w-3xl mx-auto px-6 py-12" {
                    @if let Some(flash) = flash {
                        (flash_banner(flash))
                    }
                    (body)
                }
            }
        }
    }
    .into_string()
}

fn flash_banner(flash: &Flash) -> Markup {
    let class = match flash.level {
        Level::Success => "mb-6 rounded-md border border-green-200 bg-green-50 px-4 py-3 text-green-800",
        Level::Danger => "mb-6 rounded-md border border-red-200 bg-red-50 px-4 py-3 text-red-800",
    };
    html! { div class=(class) role="status" { (flash.message) } }
}

fn form_error(error: Option<&str>) -> Markup {
    html! {
        @if let Some(error) = error {
            p class="mt-4 rounded-md bg-red-50 px-4 py-3 text-sm text-red-800" role="alert" { (error) }
        }
    }
}

fn movie_card(user_id: i32, movie: &Movie) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-6 flex gap-6" {
            @if let Some(poster) = &movie.poster {
                img class="h-36 w-24 rounded object-cover" src=(poster) alt=(format!("Poster for {}", movie.name));
            }
            div class="flex-1" {
                h2 class="text-xl font-semibold text-gray-900" {
                    (movie.name)
                    @if movie.year > 0 {
                        span class="ml-2 font-normal text-gray-500" { "(" (movie.year) ")" }
                    }
                }
                p class="mt-1 text-sm text-gray-600" { "Directed by " (movie.director) }
                p class="mt-1 text-sm text-gray-600" { "Rating " (format!("{:.1}", movie.rating)) }
                div class="mt-4 flex items-center gap-4" {
                    a class=(LINK_CLASS) href=(format!("/users/{user_id}/update_movie/{}", movie.id)) { "Edit" }
                    form method="post" action=(format!("/users/{user_id}/delete_movie/{}", movie.id)) {
                        button class="text-sm text-red-600 hover:text-red-800" type="submit" { "Delete" }
                    }
                }
            }
        }
    }
}
