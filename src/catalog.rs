use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    JoinType, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
    Set, TransactionTrait,
};

use crate::{
    entities::{director, genre, movie},
    error::{AppError, AppResult},
    models::{MovieFields, MovieFilter, MoviePatch, MovieRecord},
};

/// Storage access for the catalog. Each mutation runs in its own
/// transaction, which rolls back if dropped before commit.
#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn list_movies(&self, filter: MovieFilter) -> AppResult<Vec<MovieRecord>> {
        let mut query = movie_records();
        if let Some(director_id) = filter.director_id {
            query = query.filter(movie::Column::DirectorId.eq(director_id));
        }
        if let Some(genre_id) = filter.genre_id {
            query = query.filter(movie::Column::GenreId.eq(genre_id));
        }

        let movies = query.into_model::<MovieRecord>().all(&self.db).await?;
        tracing::debug!(count = movies.len(), ?filter, "listed movies");
        Ok(movies)
    }

    pub async fn get_movie(&self, id: i32) -> AppResult<Option<MovieRecord>> {
        let movie = movie_records()
            .filter(movie::Column::Id.eq(id))
            .into_model::<MovieRecord>()
            .one(&self.db)
            .await?;
        Ok(movie)
    }

    pub async fn create_movie(&self, fields: MovieFields) -> AppResult<i32> {
        let txn = self.db.begin().await?;
        ensure_genre(&txn, fields.genre_id).await?;
        ensure_director(&txn, fields.director_id).await?;

        let model = movie::ActiveModel {
            id: NotSet,
            title: Set(fields.title),
            description: Set(fields.description),
            trailer: Set(fields.trailer),
            year: Set(fields.year),
            rating: Set(fields.rating),
            genre_id: Set(fields.genre_id),
            director_id: Set(fields.director_id),
        };
        let inserted = model.insert(&txn).await?;
        txn.commit().await?;

        tracing::info!(id = inserted.id, "movie created");
        Ok(inserted.id)
    }

    /// Overwrites every mutable column, clearing the ones `fields` leaves empty.
    pub async fn replace_movie(&self, id: i32, fields: MovieFields) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let existing = movie::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::not_found("Movie", id))?;
        ensure_genre(&txn, fields.genre_id).await?;
        ensure_director(&txn, fields.director_id).await?;

        let mut active = existing.into_active_model();
        active.title = Set(fields.title);
        active.description = Set(fields.description);
        active.trailer = Set(fields.trailer);
        active.year = Set(fields.year);
        active.rating = Set(fields.rating);
        active.genre_id = Set(fields.genre_id);
        active.director_id = Set(fields.director_id);
        active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(id, "movie replaced");
        Ok(())
    }

    pub async fn patch_movie(&self, id: i32, patch: MoviePatch) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let existing = movie::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::not_found("Movie", id))?;

        let mut active = existing.into_active_model();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(trailer) = patch.trailer {
            active.trailer = Set(trailer);
        }
        if let Some(year) = patch.year {
            active.year = Set(year);
        }
        if let Some(rating) = patch.rating {
            active.rating = Set(rating);
        }
        if let Some(genre_id) = patch.genre_id {
            ensure_genre(&txn, genre_id).await?;
            active.genre_id = Set(genre_id);
        }
        if let Some(director_id) = patch.director_id {
            ensure_director(&txn, director_id).await?;
            active.director_id = Set(director_id);
        }

        if active.is_changed() {
            active.update(&txn).await?;
        }
        txn.commit().await?;

        tracing::info!(id, "movie patched");
        Ok(())
    }

    pub async fn delete_movie(&self, id: i32) -> AppResult<()> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::not_found("Movie", id));
        }
        tracing::info!(id, "movie deleted");
        Ok(())
    }

    pub async fn list_directors(&self) -> AppResult<Vec<director::Model>> {
        let directors =
            director::Entity::find().order_by_asc(director::Column::Id).all(&self.db).await?;
        Ok(directors)
    }

    pub async fn get_director(&self, id: i32) -> AppResult<Option<director::Model>> {
        Ok(director::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn create_director(&self, name: String) -> AppResult<i32> {
        let model = director::ActiveModel { id: NotSet, name: Set(name) };
        let inserted = model.insert(&self.db).await?;
        tracing::info!(id = inserted.id, "director created");
        Ok(inserted.id)
    }

    pub async fn rename_director(&self, id: i32, name: String) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let mut active = director::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::not_found("Director", id))?
            .into_active_model();
        active.name = Set(name);
        active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(id, "director updated");
        Ok(())
    }

    /// Refuses to delete a director that movies still point at.
    pub async fn delete_director(&self, id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let referencing = movie::Entity::find()
            .filter(movie::Column::DirectorId.eq(id))
            .count(&txn)
            .await?;
        if referencing > 0 {
            return Err(AppError::Conflict(format!(
                "Director with id {id} is referenced by {referencing} movie(s)"
            )));
        }

        let res = director::Entity::delete_by_id(id).exec(&txn).await?;
        if res.rows_affected == 0 {
            return Err(AppError::not_found("Director", id));
        }
        txn.commit().await?;

        tracing::info!(id, "director deleted");
        Ok(())
    }

    pub async fn list_genres(&self) -> AppResult<Vec<genre::Model>> {
        let genres = genre::Entity::find().order_by_asc(genre::Column::Id).all(&self.db).await?;
        Ok(genres)
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<Option<genre::Model>> {
        Ok(genre::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn create_genre(&self, name: String) -> AppResult<i32> {
        let model = genre::ActiveModel { id: NotSet, name: Set(name) };
        let inserted = model.insert(&self.db).await?;
        tracing::info!(id = inserted.id, "genre created");
        Ok(inserted.id)
    }

    pub async fn rename_genre(&self, id: i32, name: String) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let mut active = genre::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::not_found("Genre", id))?
            .into_active_model();
        active.name = Set(name);
        active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(id, "genre updated");
        Ok(())
    }

    /// Refuses to delete a genre that movies still point at.
    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        let txn = self.db.begin().await?;
        let referencing =
            movie::Entity::find().filter(movie::Column::GenreId.eq(id)).count(&txn).await?;
        if referencing > 0 {
            return Err(AppError::Conflict(format!(
                "Genre with id {id} is referenced by {referencing} movie(s)"
            )));
        }

        let res = genre::Entity::delete_by_id(id).exec(&txn).await?;
        if res.rows_affected == 0 {
            return Err(AppError::not_found("Genre", id));
        }
        txn.commit().await?;

        tracing::info!(id, "genre deleted");
        Ok(())
    }
}

// Left joins keep movies whose references were cleared by a full replace.
fn movie_records() -> Select<movie::Entity> {
    movie::Entity::find()
        .select_only()
        .columns([
            movie::Column::Id,
            movie::Column::Title,
            movie::Column::Description,
            movie::Column::Trailer,
            movie::Column::Year,
            movie::Column::Rating,
        ])
        .column_as(genre::Column::Name, "genre")
        .column_as(director::Column::Name, "director")
        .join(JoinType::LeftJoin, movie::Relation::Genre.def())
        .join(JoinType::LeftJoin, movie::Relation::Director.def())
        .order_by_asc(movie::Column::Id)
}

async fn ensure_genre<C: ConnectionTrait>(conn: &C, id: Option<i32>) -> AppResult<()> {
    let Some(id) = id else {
        return Ok(());
    };
    if genre::Entity::find_by_id(id).one(conn).await?.is_none() {
        return Err(AppError::Conflict(format!("Genre with id {id} does not exist")));
    }
    Ok(())
}

async fn ensure_director<C: ConnectionTrait>(conn: &C, id: Option<i32>) -> AppResult<()> {
    let Some(id) = id else {
        return Ok(());
    };
    if director::Entity::find_by_id(id).one(conn).await?.is_none() {
        return Err(AppError::Conflict(format!("Director with id {id} does not exist")));
    }
    Ok(())
}
