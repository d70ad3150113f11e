pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_users_and_movies;
mod m20240602_000001_add_movies_user_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_users_and_movies::Migration),
            Box::new(m20240602_000001_add_movies_user_index::Migration),
        ]
    }
}
