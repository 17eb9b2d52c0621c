//! PostgreSQL implementation of the hotel repository.
//!
//! Writes the property graph with one transaction per call, using
//! `ON CONFLICT DO UPDATE` for the one-to-one rows and `UNNEST` batch
//! inserts for every replaced collection.
//!
//! ## Database Tables
//!
//! - `hotels`: root row keyed by the external hotel id
//! - `hotel_addresses`, `hotel_checkins`: one row per hotel
//! - `hotel_checkin_instructions`: ordered lines owned by the check-in row
//! - `hotel_photos`, `hotel_facilities`, `hotel_policies`: replaced per hotel
//! - `hotel_rooms` plus `room_bed_types`, `room_amenities`, `room_photos`
//! - `reviews`, `translations`: replaced by their own sync kinds
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use cupid_shared::{
    Address, Checkin, EmbeddingStatus, Facility, HotelId, HotelRecord, Photo, Policy, Property,
    Review, Room, Translation,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use super::rows::{HotelRow, ReviewRow, TranslationRow};
use crate::{dedupe_translations, HotelRepository, RepositoryError};

type Tx<'a> = Transaction<'a, Postgres>;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL implementation of [`HotelRepository`].
///
/// Writes for one hotel id are serialised by the row lock on `hotels`:
/// `store_property` takes it with the upsert, `store_reviews` and
/// `store_translations` with `SELECT ... FOR UPDATE`. The lock is held until
/// commit, so two writers never interleave their delete and insert phases.
pub struct PostgresHotelRepository {
    pool: PgPool,
}

impl PostgresHotelRepository {
    /// Wraps an existing pool. The schema in `migrations/` must be applied.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a bounded pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }

    /// Applies the bundled migrations.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(sqlx::Error::from)?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn upsert_hotel_tx(
        &self,
        property: &Property,
        tx: &mut Tx<'_>,
    ) -> Result<HotelId, RepositoryError> {
        let hotel_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO hotels (
                hotel_id, cupid_id, main_image_th, hotel_type, hotel_type_id,
                chain, chain_id, latitude, longitude, hotel_name, phone, fax, email,
                stars, airport_code, rating, review_count, parking, group_room_min,
                child_allowed, pets_allowed, description, markdown_description, important_info
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22, $23, $24)
            ON CONFLICT (hotel_id) DO UPDATE SET
                updated_at = NOW(),
                cupid_id = EXCLUDED.cupid_id,
                main_image_th = EXCLUDED.main_image_th,
                hotel_type = EXCLUDED.hotel_type,
                hotel_type_id = EXCLUDED.hotel_type_id,
                chain = EXCLUDED.chain,
                chain_id = EXCLUDED.chain_id,
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                hotel_name = EXCLUDED.hotel_name,
                phone = EXCLUDED.phone,
                fax = EXCLUDED.fax,
                email = EXCLUDED.email,
                stars = EXCLUDED.stars,
                airport_code = EXCLUDED.airport_code,
                rating = EXCLUDED.rating,
                review_count = EXCLUDED.review_count,
                parking = EXCLUDED.parking,
                group_room_min = EXCLUDED.group_room_min,
                child_allowed = EXCLUDED.child_allowed,
                pets_allowed = EXCLUDED.pets_allowed,
                description = EXCLUDED.description,
                markdown_description = EXCLUDED.markdown_description,
                important_info = EXCLUDED.important_info
            RETURNING hotel_id
            "#,
        )
        .bind(property.hotel_id)
        .bind(property.cupid_id)
        .bind(&property.main_image_th)
        .bind(&property.hotel_type)
        .bind(property.hotel_type_id)
        .bind(&property.chain)
        .bind(property.chain_id)
        .bind(property.latitude)
        .bind(property.longitude)
        .bind(&property.hotel_name)
        .bind(&property.phone)
        .bind(&property.fax)
        .bind(&property.email)
        .bind(property.stars)
        .bind(&property.airport_code)
        .bind(property.rating)
        .bind(property.review_count)
        .bind(&property.parking)
        .bind(property.group_room_min)
        .bind(property.child_allowed)
        .bind(property.pets_allowed)
        .bind(&property.description)
        .bind(&property.markdown_description)
        .bind(&property.important_info)
        .fetch_one(&mut **tx)
        .await?;

        Ok(hotel_id)
    }

    async fn upsert_address_tx(
        &self,
        hotel_id: HotelId,
        address: &Address,
        tx: &mut Tx<'_>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO hotel_addresses (hotel_id, address, city, state, country, postal_code)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (hotel_id) DO UPDATE SET
                address = EXCLUDED.address,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                country = EXCLUDED.country,
                postal_code = EXCLUDED.postal_code
            "#,
        )
        .bind(hotel_id)
        .bind(&address.address)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.country)
        .bind(&address.postal_code)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Upserts the check-in row, then replaces its instructions when the
    /// incoming list is non-empty.
    async fn upsert_checkin_tx(
        &self,
        hotel_id: HotelId,
        checkin: &Checkin,
        tx: &mut Tx<'_>,
    ) -> Result<(), RepositoryError> {
        let checkin_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO hotel_checkins (hotel_id, checkin_start, checkin_end, checkout, special_instructions)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (hotel_id) DO UPDATE SET
                checkin_start = EXCLUDED.checkin_start,
                checkin_end = EXCLUDED.checkin_end,
                checkout = EXCLUDED.checkout,
                special_instructions = EXCLUDED.special_instructions
            RETURNING id
            "#,
        )
        .bind(hotel_id)
        .bind(&checkin.checkin_start)
        .bind(&checkin.checkin_end)
        .bind(&checkin.checkout)
        .bind(&checkin.special_instructions)
        .fetch_one(&mut **tx)
        .await?;

        if checkin.instructions.is_empty() {
            return Ok(());
        }

        sqlx::query("DELETE FROM hotel_checkin_instructions WHERE hotel_checkin_id = $1")
            .bind(checkin_id)
            .execute(&mut **tx)
            .await?;

        let sort_orders: Vec<i32> = (0..checkin.instructions.len() as i32).collect();
        sqlx::query(
            r#"
            INSERT INTO hotel_checkin_instructions (hotel_checkin_id, instruction, sort_order)
            SELECT $1, u.instruction, u.sort_order
            FROM UNNEST($2::text[], $3::int[]) AS u(instruction, sort_order)
            "#,
        )
        .bind(checkin_id)
        .bind(&checkin.instructions)
        .bind(&sort_orders)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn replace_photos_tx(
        &self,
        hotel_id: HotelId,
        photos: &[Photo],
        tx: &mut Tx<'_>,
    ) -> Result<(), RepositoryError> {
        if photos.is_empty() {
            return Ok(());
        }

        sqlx::query("DELETE FROM hotel_photos WHERE hotel_id = $1")
            .bind(hotel_id)
            .execute(&mut **tx)
            .await?;

        let mut columns = PhotoColumns::default();
        for photo in photos {
            columns.push(hotel_id, photo);
        }
        columns.insert("hotel_photos", "hotel_id", tx).await
    }

    async fn replace_facilities_tx(
        &self,
        hotel_id: HotelId,
        facilities: &[Facility],
        tx: &mut Tx<'_>,
    ) -> Result<(), RepositoryError> {
        if facilities.is_empty() {
            return Ok(());
        }

        sqlx::query("DELETE FROM hotel_facilities WHERE hotel_id = $1")
            .bind(hotel_id)
            .execute(&mut **tx)
            .await?;

        let ids: Vec<i64> = facilities.iter().map(|f| f.facility_id).collect();
        let names: Vec<&str> = facilities.iter().map(|f| f.name.as_str()).collect();

        sqlx::query(
            r#"
            INSERT INTO hotel_facilities (hotel_id, facility_id, name)
            SELECT $1, u.facility_id, u.name
            FROM UNNEST($2::bigint[], $3::text[]) AS u(facility_id, name)
            "#,
        )
        .bind(hotel_id)
        .bind(&ids)
        .bind(&names)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn replace_policies_tx(
        &self,
        hotel_id: HotelId,
        policies: &[Policy],
        tx: &mut Tx<'_>,
    ) -> Result<(), RepositoryError> {
        if policies.is_empty() {
            return Ok(());
        }

        sqlx::query("DELETE FROM hotel_policies WHERE hotel_id = $1")
            .bind(hotel_id)
            .execute(&mut **tx)
            .await?;

        let policy_types: Vec<&str> = policies.iter().map(|p| p.policy_type.as_str()).collect();
        let names: Vec<&str> = policies.iter().map(|p| p.name.as_str()).collect();
        let descriptions: Vec<&str> = policies.iter().map(|p| p.description.as_str()).collect();
        let child_allowed: Vec<&str> = policies.iter().map(|p| p.child_allowed.as_str()).collect();
        let pets_allowed: Vec<&str> = policies.iter().map(|p| p.pets_allowed.as_str()).collect();
        let parking: Vec<&str> = policies.iter().map(|p| p.parking.as_str()).collect();
        let cupid_ids: Vec<i64> = policies.iter().map(|p| p.id).collect();

        sqlx::query(
            r#"
            INSERT INTO hotel_policies (
                hotel_id, policy_type, name, description, child_allowed, pets_allowed, parking, cupid_policy_id
            )
            SELECT $1, u.policy_type, u.name, u.description, u.child_allowed, u.pets_allowed, u.parking, u.cupid_policy_id
            FROM UNNEST($2::text[], $3::text[], $4::text[], $5::text[], $6::text[], $7::text[], $8::bigint[])
                AS u(policy_type, name, description, child_allowed, pets_allowed, parking, cupid_policy_id)
            "#,
        )
        .bind(hotel_id)
        .bind(&policy_types)
        .bind(&names)
        .bind(&descriptions)
        .bind(&child_allowed)
        .bind(&pets_allowed)
        .bind(&parking)
        .bind(&cupid_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Replaces the hotel's rooms and every room child.
    ///
    /// Rooms are inserted first and their generated ids read back from
    /// `RETURNING`; children are then attached through the
    /// Cupid room id → row id map built from that result.
    async fn replace_rooms_tx(
        &self,
        hotel_id: HotelId,
        rooms: &[Room],
        tx: &mut Tx<'_>,
    ) -> Result<(), RepositoryError> {
        if rooms.is_empty() {
            return Ok(());
        }

        // Cascades to bed types, amenities and room photos.
        sqlx::query("DELETE FROM hotel_rooms WHERE hotel_id = $1")
            .bind(hotel_id)
            .execute(&mut **tx)
            .await?;

        let cupid_room_ids: Vec<i64> = rooms.iter().map(|r| r.id).collect();
        let room_names: Vec<&str> = rooms.iter().map(|r| r.room_name.as_str()).collect();
        let descriptions: Vec<&str> = rooms.iter().map(|r| r.description.as_str()).collect();
        let sizes: Vec<i32> = rooms.iter().map(|r| r.room_size_square).collect();
        let size_units: Vec<&str> = rooms.iter().map(|r| r.room_size_unit.as_str()).collect();
        let max_adults: Vec<i32> = rooms.iter().map(|r| r.max_adults).collect();
        let max_children: Vec<i32> = rooms.iter().map(|r| r.max_children).collect();
        let max_occupancy: Vec<i32> = rooms.iter().map(|r| r.max_occupancy).collect();
        let bed_relations: Vec<&str> = rooms.iter().map(|r| r.bed_relation.as_str()).collect();

        let inserted: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            INSERT INTO hotel_rooms (
                hotel_id, cupid_room_id, room_name, description, room_size_square, room_size_unit,
                max_adults, max_children, max_occupancy, bed_relation
            )
            SELECT $1, u.cupid_room_id, u.room_name, u.description, u.room_size_square, u.room_size_unit,
                   u.max_adults, u.max_children, u.max_occupancy, u.bed_relation
            FROM UNNEST($2::bigint[], $3::text[], $4::text[], $5::int[], $6::text[], $7::int[], $8::int[], $9::int[], $10::text[])
                AS u(cupid_room_id, room_name, description, room_size_square, room_size_unit,
                     max_adults, max_children, max_occupancy, bed_relation)
            RETURNING id, cupid_room_id
            "#,
        )
        .bind(hotel_id)
        .bind(&cupid_room_ids)
        .bind(&room_names)
        .bind(&descriptions)
        .bind(&sizes)
        .bind(&size_units)
        .bind(&max_adults)
        .bind(&max_children)
        .bind(&max_occupancy)
        .bind(&bed_relations)
        .fetch_all(&mut **tx)
        .await?;

        let room_ids: HashMap<i64, i64> = inserted
            .into_iter()
            .map(|(id, cupid_room_id)| (cupid_room_id, id))
            .collect();

        let mut bed_room_ids = Vec::new();
        let mut bed_quantities = Vec::new();
        let mut bed_types = Vec::new();
        let mut bed_sizes = Vec::new();
        let mut bed_cupid_ids = Vec::new();

        let mut amenity_room_ids = Vec::new();
        let mut amenity_ids = Vec::new();
        let mut amenity_names = Vec::new();
        let mut amenity_sorts = Vec::new();

        let mut photos = PhotoColumns::default();

        for room in rooms {
            let room_id = resolve_room_id(&room_ids, hotel_id, room.id)?;

            for bed in &room.bed_types {
                bed_room_ids.push(room_id);
                bed_quantities.push(bed.quantity);
                bed_types.push(bed.bed_type.as_str());
                bed_sizes.push(bed.bed_size.as_str());
                bed_cupid_ids.push(bed.id);
            }
            for amenity in &room.room_amenities {
                amenity_room_ids.push(room_id);
                amenity_ids.push(amenity.amenities_id);
                amenity_names.push(amenity.name.as_str());
                amenity_sorts.push(amenity.sort);
            }
            for photo in &room.photos {
                photos.push(room_id, photo);
            }
        }

        if !bed_room_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO room_bed_types (room_id, quantity, bed_type, bed_size, cupid_bed_id)
                SELECT * FROM UNNEST($1::bigint[], $2::int[], $3::text[], $4::text[], $5::bigint[])
                "#,
            )
            .bind(&bed_room_ids)
            .bind(&bed_quantities)
            .bind(&bed_types)
            .bind(&bed_sizes)
            .bind(&bed_cupid_ids)
            .execute(&mut **tx)
            .await?;
        }

        if !amenity_room_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO room_amenities (room_id, amenities_id, name, sort_order)
                SELECT * FROM UNNEST($1::bigint[], $2::bigint[], $3::text[], $4::int[])
                "#,
            )
            .bind(&amenity_room_ids)
            .bind(&amenity_ids)
            .bind(&amenity_names)
            .bind(&amenity_sorts)
            .execute(&mut **tx)
            .await?;
        }

        if !photos.is_empty() {
            photos.insert("room_photos", "room_id", tx).await?;
        }

        Ok(())
    }

    /// Locks the hotel row for the rest of the transaction.
    async fn lock_hotel_tx(&self, hotel_id: HotelId, tx: &mut Tx<'_>) -> Result<(), RepositoryError> {
        sqlx::query_scalar::<_, i64>("SELECT hotel_id FROM hotels WHERE hotel_id = $1 FOR UPDATE")
            .bind(hotel_id)
            .fetch_optional(&mut **tx)
            .await?
            .map(|_| ())
            .ok_or(RepositoryError::UnknownHotel(hotel_id))
    }
}

/// Column vectors for an `UNNEST` photo insert. Hotel and room photos share
/// the layout and differ only in the owning column.
#[derive(Default)]
struct PhotoColumns<'a> {
    owners: Vec<i64>,
    urls: Vec<&'a str>,
    hd_urls: Vec<&'a str>,
    descriptions: Vec<&'a str>,
    class1: Vec<&'a str>,
    class2: Vec<&'a str>,
    main_photo: Vec<bool>,
    scores: Vec<f64>,
    class_ids: Vec<i32>,
    class_orders: Vec<i32>,
}

impl<'a> PhotoColumns<'a> {
    fn push(&mut self, owner: i64, photo: &'a Photo) {
        self.owners.push(owner);
        self.urls.push(&photo.url);
        self.hd_urls.push(&photo.hd_url);
        self.descriptions.push(&photo.image_description);
        self.class1.push(&photo.image_class1);
        self.class2.push(&photo.image_class2);
        self.main_photo.push(photo.main_photo);
        self.scores.push(photo.score);
        self.class_ids.push(photo.class_id);
        self.class_orders.push(photo.class_order);
    }

    fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    async fn insert(
        &self,
        table: &str,
        owner_column: &str,
        tx: &mut Tx<'_>,
    ) -> Result<(), RepositoryError> {
        let sql = format!(
            "INSERT INTO {table} ({owner_column}, url, hd_url, image_description, image_class1, \
             image_class2, main_photo, score, class_id, class_order) \
             SELECT * FROM UNNEST($1::bigint[], $2::text[], $3::text[], $4::text[], $5::text[], \
             $6::text[], $7::boolean[], $8::float8[], $9::int[], $10::int[])"
        );

        sqlx::query(&sql)
            .bind(&self.owners)
            .bind(&self.urls)
            .bind(&self.hd_urls)
            .bind(&self.descriptions)
            .bind(&self.class1)
            .bind(&self.class2)
            .bind(&self.main_photo)
            .bind(&self.scores)
            .bind(&self.class_ids)
            .bind(&self.class_orders)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

/// Maps a foreign-key violation on a hotel-scoped write to `UnknownHotel`.
fn hotel_write_error(hotel_id: HotelId, err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            RepositoryError::UnknownHotel(hotel_id)
        }
        _ => RepositoryError::DatabaseError(err),
    }
}

#[async_trait]
impl HotelRepository for PostgresHotelRepository {
    #[instrument(skip(self, property), fields(hotel_id = property.hotel_id))]
    async fn store_property(&self, property: &Property) -> Result<HotelId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let hotel_id = self.upsert_hotel_tx(property, &mut tx).await?;
        self.upsert_address_tx(hotel_id, &property.address, &mut tx).await?;
        self.upsert_checkin_tx(hotel_id, &property.checkin, &mut tx).await?;
        self.replace_photos_tx(hotel_id, &property.photos, &mut tx).await?;
        self.replace_facilities_tx(hotel_id, &property.facilities, &mut tx).await?;
        self.replace_policies_tx(hotel_id, &property.policies, &mut tx).await?;
        self.replace_rooms_tx(hotel_id, &property.rooms, &mut tx).await?;

        tx.commit().await?;

        debug!(
            photos = property.photos.len(),
            facilities = property.facilities.len(),
            policies = property.policies.len(),
            rooms = property.rooms.len(),
            "Stored property"
        );
        Ok(hotel_id)
    }

    #[instrument(skip(self, reviews), fields(count = reviews.len()))]
    async fn store_reviews(
        &self,
        hotel_id: HotelId,
        reviews: &[Review],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        self.lock_hotel_tx(hotel_id, &mut tx).await?;

        sqlx::query("DELETE FROM reviews WHERE hotel_id = $1")
            .bind(hotel_id)
            .execute(&mut *tx)
            .await?;

        if !reviews.is_empty() {
            let names: Vec<&str> = reviews.iter().map(|r| r.reviewer_name.as_str()).collect();
            let ratings: Vec<i32> = reviews.iter().map(|r| r.rating).collect();
            let titles: Vec<&str> = reviews.iter().map(|r| r.title.as_str()).collect();
            let contents: Vec<&str> = reviews.iter().map(|r| r.content.as_str()).collect();
            let languages: Vec<&str> = reviews.iter().map(|r| r.language_code.as_str()).collect();
            let dates: Vec<&str> = reviews.iter().map(|r| r.review_date.as_str()).collect();
            let votes: Vec<i32> = reviews.iter().map(|r| r.helpful_votes).collect();
            let statuses: Vec<&str> = reviews.iter().map(|r| r.embedding_status.as_str()).collect();

            // Ordinality keeps generated ids in input order.
            sqlx::query(
                r#"
                INSERT INTO reviews (
                    hotel_id, reviewer_name, rating, title, content, language_code,
                    review_date, helpful_votes, embedding_status
                )
                SELECT $1, u.reviewer_name, u.rating, u.title, u.content, u.language_code,
                       u.review_date, u.helpful_votes, u.embedding_status
                FROM UNNEST($2::text[], $3::int[], $4::text[], $5::text[], $6::text[], $7::text[], $8::int[], $9::text[])
                    WITH ORDINALITY
                    AS u(reviewer_name, rating, title, content, language_code, review_date, helpful_votes, embedding_status, ord)
                ORDER BY u.ord
                "#,
            )
            .bind(hotel_id)
            .bind(&names)
            .bind(&ratings)
            .bind(&titles)
            .bind(&contents)
            .bind(&languages)
            .bind(&dates)
            .bind(&votes)
            .bind(&statuses)
            .execute(&mut *tx)
            .await
            .map_err(|e| hotel_write_error(hotel_id, e))?;
        }

        tx.commit().await?;
        Ok(())
    }

    #[instrument(skip(self, translations), fields(count = translations.len()))]
    async fn store_translations(
        &self,
        hotel_id: HotelId,
        translations: &[Translation],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        self.lock_hotel_tx(hotel_id, &mut tx).await?;

        if translations.is_empty() {
            sqlx::query("DELETE FROM translations WHERE hotel_id = $1")
                .bind(hotel_id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            return Ok(());
        }

        let languages: Vec<&str> = translations
            .iter()
            .map(|t| t.language_code.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        sqlx::query("DELETE FROM translations WHERE hotel_id = $1 AND language_code = ANY($2::text[])")
            .bind(hotel_id)
            .bind(&languages)
            .execute(&mut *tx)
            .await?;

        let rows = dedupe_translations(translations);
        let entity_types: Vec<&str> = rows.iter().map(|t| t.entity_type.as_str()).collect();
        let entity_ids: Vec<i64> = rows.iter().map(|t| t.entity_id).collect();
        let language_codes: Vec<&str> = rows.iter().map(|t| t.language_code.as_str()).collect();
        let field_names: Vec<&str> = rows.iter().map(|t| t.field_name.as_str()).collect();
        let texts: Vec<&str> = rows.iter().map(|t| t.translated_text.as_str()).collect();

        // Facility ids are global, so a key may already belong to another hotel.
        sqlx::query(
            r#"
            INSERT INTO translations (hotel_id, entity_type, entity_id, language_code, field_name, translated_text)
            SELECT $1, u.entity_type, u.entity_id, u.language_code, u.field_name, u.translated_text
            FROM UNNEST($2::text[], $3::bigint[], $4::text[], $5::text[], $6::text[])
                AS u(entity_type, entity_id, language_code, field_name, translated_text)
            ON CONFLICT (entity_type, entity_id, language_code, field_name) DO UPDATE SET
                hotel_id = EXCLUDED.hotel_id,
                translated_text = EXCLUDED.translated_text,
                updated_at = NOW()
            "#,
        )
        .bind(hotel_id)
        .bind(&entity_types)
        .bind(&entity_ids)
        .bind(&language_codes)
        .bind(&field_names)
        .bind(&texts)
        .execute(&mut *tx)
        .await
        .map_err(|e| hotel_write_error(hotel_id, e))?;

        tx.commit().await?;
        debug!(languages = ?languages, rows = rows.len(), "Stored translations");
        Ok(())
    }

    async fn get_hotel_by_id(&self, hotel_id: HotelId) -> Result<HotelRecord, RepositoryError> {
        sqlx::query_as::<_, HotelRow>(
            "SELECT hotel_id, cupid_id, hotel_name, rating, review_count, stars, created_at, updated_at \
             FROM hotels WHERE hotel_id = $1",
        )
        .bind(hotel_id)
        .fetch_optional(&self.pool)
        .await?
        .map(HotelRecord::from)
        .ok_or(RepositoryError::HotelNotFound(hotel_id))
    }

    async fn get_hotels(&self, limit: i64, offset: i64) -> Result<Vec<HotelRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, HotelRow>(
            "SELECT hotel_id, cupid_id, hotel_name, rating, review_count, stars, created_at, updated_at \
             FROM hotels ORDER BY hotel_id LIMIT $1 OFFSET $2",
        )
        .bind(limit.max(0))
        .bind(offset.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(HotelRecord::from).collect())
    }

    async fn get_hotel_reviews(&self, hotel_id: HotelId) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, hotel_id, reviewer_name, rating, title, content, language_code, review_date, \
             helpful_votes, embedding_status, created_at \
             FROM reviews WHERE hotel_id = $1 ORDER BY id",
        )
        .bind(hotel_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Review::try_from).collect()
    }

    async fn get_hotel_translations(
        &self,
        hotel_id: HotelId,
        language_code: &str,
    ) -> Result<Vec<Translation>, RepositoryError> {
        let rows = sqlx::query_as::<_, TranslationRow>(
            "SELECT hotel_id, entity_type, entity_id, language_code, field_name, translated_text \
             FROM translations WHERE hotel_id = $1 AND language_code = $2 \
             ORDER BY entity_type, entity_id, field_name",
        )
        .bind(hotel_id)
        .bind(language_code)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Translation::try_from).collect()
    }

    async fn update_review_embedding_status(
        &self,
        review_id: i64,
        status: EmbeddingStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE reviews SET embedding_status = $2 WHERE id = $1")
            .bind(review_id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::ReviewNotFound(review_id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Maps a Cupid room id to the row id returned by the room insert.
///
/// Every input room is inserted in the same statement, so a miss means the
/// insert and the input disagree; it aborts the transaction.
fn resolve_room_id(
    room_ids: &HashMap<i64, i64>,
    hotel_id: HotelId,
    cupid_room_id: i64,
) -> Result<i64, RepositoryError> {
    room_ids
        .get(&cupid_room_id)
        .copied()
        .ok_or(RepositoryError::UnmappedRoom {
            hotel_id,
            cupid_room_id,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_room_id() {
        let room_ids = HashMap::from([(10, 501), (20, 502)]);

        assert_eq!(resolve_room_id(&room_ids, 1641879, 10).unwrap(), 501);
        assert_eq!(resolve_room_id(&room_ids, 1641879, 20).unwrap(), 502);
        assert!(matches!(
            resolve_room_id(&room_ids, 1641879, 30),
            Err(RepositoryError::UnmappedRoom {
                hotel_id: 1641879,
                cupid_room_id: 30
            })
        ));
    }
}
