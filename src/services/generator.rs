//! Derived product generation.
//!
//! A run cross-joins every base product (`generatable`, not `generated`) with
//! every generator entity (has a parent, `show`) and upserts one derived
//! product per pair, copying the base product's gallery and parameter values.
//! Derived rows are identified by `(base_product_id, generator_id)`; the
//! unique `name` column is only checked, never used as the upsert key.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use metrics::{counter, gauge, histogram};
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, EntityTrait, QueryFilter, QueryOrder, Statement, TransactionTrait,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{
    catalog_entity, image, product, product_parameter_value, StringList,
};
use crate::errors::ServiceError;

/// Key for `pg_advisory_xact_lock`, shared by every process generating against one database.
const GENERATOR_LOCK_KEY: i64 = 0x6361_726f_6765_6e00;

/// Upper bound on values bound in a single `IN (...)` list.
const IN_CLAUSE_CHUNK: usize = 500;

/// Parses a text price as a base-10 integer. Missing or malformed prices count as zero.
///
/// Surrounding whitespace makes a price malformed.
pub fn parse_price(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return 0;
    };
    match raw.parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            if !raw.is_empty() {
                debug!(price = raw, "non-numeric price treated as zero");
            }
            0
        }
    }
}

/// Sum of the two prices, rendered back to text.
pub fn merge_price(base: Option<&str>, generator: Option<&str>) -> String {
    parse_price(base)
        .saturating_add(parse_price(generator))
        .to_string()
}

/// Base keywords followed by generator keywords, keeping the first occurrence of each.
pub fn merge_keywords(base: &StringList, generator: &StringList) -> StringList {
    let mut seen = HashSet::new();
    base.iter()
        .chain(generator.iter())
        .filter(|keyword| seen.insert(keyword.as_str()))
        .cloned()
        .collect()
}

fn join_with(left: Option<&str>, separator: char, right: Option<&str>) -> String {
    format!(
        "{}{}{}",
        left.unwrap_or_default(),
        separator,
        right.unwrap_or_default()
    )
}

/// Row computed for one (base, generator) pair before it is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedProduct {
    pub base_product_id: Uuid,
    pub generator_id: Uuid,
    pub name: String,
    pub description: String,
    pub info: Option<String>,
    pub price: String,
    pub count: Option<String>,
    pub category_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub image_id: Option<Uuid>,
    pub slug: String,
    pub keywords: StringList,
}

impl DerivedProduct {
    fn pair(&self) -> (Uuid, Uuid) {
        (self.base_product_id, self.generator_id)
    }

    fn into_active_model(self, now: DateTime<Utc>) -> product::ActiveModel {
        product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(self.name),
            description: Set(Some(self.description)),
            info: Set(self.info),
            price: Set(Some(self.price)),
            count: Set(self.count),
            position: Set(None),
            code: Set(None),
            category_id: Set(self.category_id),
            brand_id: Set(self.brand_id),
            entity_id: Set(Some(self.generator_id)),
            image_id: Set(self.image_id),
            slug: Set(Some(self.slug)),
            keywords: Set(self.keywords),
            generatable: Set(false),
            generated: Set(true),
            show: Set(true),
            base_product_id: Set(Some(self.base_product_id)),
            generator_id: Set(Some(self.generator_id)),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

/// Combines one base product with one generator entity.
pub fn derive_product(
    base: &product::Model,
    generator: &catalog_entity::Model,
) -> DerivedProduct {
    DerivedProduct {
        base_product_id: base.id,
        generator_id: generator.id,
        name: format!("{} {}", base.name, generator.name),
        description: join_with(
            base.description.as_deref(),
            ' ',
            generator.description.as_deref(),
        ),
        info: base.info.clone(),
        price: merge_price(base.price.as_deref(), generator.price.as_deref()),
        count: base.count.clone(),
        category_id: base.category_id,
        brand_id: base.brand_id,
        image_id: generator.image_id,
        slug: join_with(base.slug.as_deref(), '_', generator.entity_slug.as_deref()),
        keywords: merge_keywords(&base.keywords, &generator.keywords),
    }
}

/// Builds the full cross product, generators outer and bases inner.
pub fn plan_generation(
    bases: &[product::Model],
    generators: &[catalog_entity::Model],
) -> Vec<DerivedProduct> {
    generators
        .iter()
        .flat_map(|generator| bases.iter().map(move |base| derive_product(base, generator)))
        .collect()
}

/// Rejects a plan in which two pairs would produce the same product name.
pub fn check_plan_collisions(plan: &[DerivedProduct]) -> Result<(), ServiceError> {
    let mut owners: HashMap<&str, (Uuid, Uuid)> = HashMap::with_capacity(plan.len());
    for derived in plan {
        if let Some(existing) = owners.insert(derived.name.as_str(), derived.pair()) {
            return Err(ServiceError::Conflict(format!(
                "derived name '{}' is produced by base {} / generator {} and base {} / generator {}",
                derived.name, existing.0, existing.1, derived.base_product_id, derived.generator_id
            )));
        }
    }
    Ok(())
}

/// Outcome of a generation run
#[derive(Clone, Debug, Default, Serialize, ToSchema)]
pub struct GenerationReport {
    /// Generator entities considered
    pub generators: usize,
    /// Base products considered
    pub bases: usize,
    /// Persisted ids of every derived product written by the run
    pub product_ids: Vec<Uuid>,
}

/// Runs and purges product generation.
///
/// Runs are serialized in-process by a mutex and, on PostgreSQL, across
/// processes by a transaction-scoped advisory lock.
#[derive(Clone)]
pub struct GeneratorService {
    db: Arc<DatabaseConnection>,
    run_lock: Arc<Mutex<()>>,
    statement_timeout: Option<Duration>,
}

impl GeneratorService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            run_lock: Arc::new(Mutex::new(())),
            statement_timeout: None,
        }
    }

    /// Bounds each statement of a run on PostgreSQL.
    pub fn with_statement_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.statement_timeout = timeout;
        self
    }

    async fn begin_exclusive(&self) -> Result<DatabaseTransaction, ServiceError> {
        let txn = self.db.begin().await?;
        if txn.get_database_backend() == DbBackend::Postgres {
            txn.execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "SELECT pg_advisory_xact_lock($1)",
                [GENERATOR_LOCK_KEY.into()],
            ))
            .await?;
        }
        crate::db::set_local_statement_timeout(&txn, self.statement_timeout).await?;
        Ok(txn)
    }

    /// Materializes every (generator, base) pair. All-or-nothing.
    #[instrument(skip(self))]
    pub async fn generate(&self) -> Result<GenerationReport, ServiceError> {
        let _guard = self.run_lock.lock().await;
        let started = Instant::now();
        counter!("caroption_generator.runs", 1);

        let result = self.generate_locked().await;

        histogram!(
            "caroption_generator.run_duration_seconds",
            started.elapsed().as_secs_f64()
        );
        match &result {
            Ok(report) => {
                gauge!(
                    "caroption_generator.derived_products",
                    report.product_ids.len() as f64
                );
                info!(
                    generators = report.generators,
                    bases = report.bases,
                    derived = report.product_ids.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "product generation committed"
                );
            }
            Err(e) => {
                counter!("caroption_generator.failures", 1);
                warn!(error = %e, "product generation rolled back");
            }
        }
        result
    }

    async fn generate_locked(&self) -> Result<GenerationReport, ServiceError> {
        let txn = self.begin_exclusive().await?;

        let bases = product::Entity::find()
            .filter(product::Column::Generatable.eq(true))
            .filter(product::Column::Generated.eq(false))
            .order_by_asc(product::Column::CreatedAt)
            .all(&txn)
            .await?;

        let generators = catalog_entity::Entity::find()
            .filter(catalog_entity::Column::ParentId.is_not_null())
            .filter(catalog_entity::Column::Show.eq(true))
            .order_by_asc(catalog_entity::Column::CreatedAt)
            .all(&txn)
            .await?;

        debug!(
            bases = bases.len(),
            generators = generators.len(),
            "loaded generation candidates"
        );

        let plan = plan_generation(&bases, &generators);
        check_plan_collisions(&plan)?;
        let displaced = check_store_collisions(&txn, &plan).await?;
        park_displaced(&txn, &displaced).await?;

        let base_ids: Vec<Uuid> = bases.iter().map(|b| b.id).collect();
        let galleries = load_galleries(&txn, &base_ids).await?;
        let parameter_values = load_parameter_values(&txn, &base_ids).await?;

        let now = Utc::now();
        let mut product_ids = Vec::with_capacity(plan.len());
        for derived in plan {
            let base_id = derived.base_product_id;
            let derived_id = upsert_derived(&txn, derived, now).await?;

            if let Some(images) = galleries.get(&base_id) {
                copy_images(&txn, images, derived_id, now).await?;
            }
            if let Some(values) = parameter_values.get(&base_id) {
                copy_parameter_values(&txn, values, derived_id, now).await?;
            }
            product_ids.push(derived_id);
        }

        txn.commit().await?;

        Ok(GenerationReport {
            generators: generators.len(),
            bases: bases.len(),
            product_ids,
        })
    }

    /// Deletes every generated product with its images and parameter values.
    ///
    /// Returns the number of products removed.
    #[instrument(skip(self))]
    pub async fn purge(&self) -> Result<u64, ServiceError> {
        let _guard = self.run_lock.lock().await;
        let txn = self.begin_exclusive().await?;

        let generated_ids = Query::select()
            .column(product::Column::Id)
            .from(product::Entity)
            .and_where(product::Column::Generated.eq(true))
            .to_owned();

        image::Entity::delete_many()
            .filter(image::Column::ProductId.in_subquery(generated_ids.clone()))
            .exec(&txn)
            .await?;

        product_parameter_value::Entity::delete_many()
            .filter(product_parameter_value::Column::ProductId.in_subquery(generated_ids))
            .exec(&txn)
            .await?;

        let removed = product::Entity::delete_many()
            .filter(product::Column::Generated.eq(true))
            .exec(&txn)
            .await?
            .rows_affected;

        txn.commit().await?;

        counter!("caroption_generator.purged_products", removed);
        info!(removed, "generated products purged");
        Ok(removed)
    }
}

/// Fails if a planned name already belongs to another pair or to a hand-made product.
///
/// A derived row whose own pair is planned under a new name releases its old
/// name in this run, so it is returned for parking instead of rejected.
async fn check_store_collisions<C>(
    conn: &C,
    plan: &[DerivedProduct],
) -> Result<Vec<product::Model>, ServiceError>
where
    C: ConnectionTrait,
{
    let owners: HashMap<&str, (Uuid, Uuid)> =
        plan.iter().map(|d| (d.name.as_str(), d.pair())).collect();
    let planned_pairs: HashSet<(Uuid, Uuid)> = plan.iter().map(DerivedProduct::pair).collect();
    let names: Vec<String> = plan.iter().map(|d| d.name.clone()).collect();

    let mut displaced = Vec::new();
    for chunk in names.chunks(IN_CLAUSE_CHUNK) {
        let existing = product::Entity::find()
            .filter(product::Column::Name.is_in(chunk.iter().cloned()))
            .all(conn)
            .await?;

        for row in existing {
            let Some(&(base_id, generator_id)) = owners.get(row.name.as_str()) else {
                continue;
            };
            let row_pair = match (row.generated, row.base_product_id, row.generator_id) {
                (true, Some(base), Some(generator)) => Some((base, generator)),
                _ => None,
            };
            match row_pair {
                Some(pair) if pair == (base_id, generator_id) => {}
                Some(pair) if planned_pairs.contains(&pair) => displaced.push(row),
                _ => {
                    return Err(ServiceError::Conflict(format!(
                        "derived name '{}' for base {} / generator {} is already used by product {}",
                        row.name, base_id, generator_id, row.id
                    )));
                }
            }
        }
    }
    Ok(displaced)
}

/// Moves displaced rows to a name of their own so the unique `name` index
/// accepts the upserts in any order. Each parked row is renamed again by its
/// own upsert before the transaction commits.
async fn park_displaced<C>(conn: &C, displaced: &[product::Model]) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    for row in displaced {
        debug!(product_id = %row.id, name = %row.name, "releasing derived name for rename");
        product::Entity::update_many()
            .col_expr(
                product::Column::Name,
                Expr::value(format!("{} #{}", row.name, row.id)),
            )
            .filter(product::Column::Id.eq(row.id))
            .exec(conn)
            .await?;
    }
    Ok(())
}

async fn load_galleries<C>(
    conn: &C,
    base_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<image::Model>>, ServiceError>
where
    C: ConnectionTrait,
{
    let mut by_product: HashMap<Uuid, Vec<image::Model>> = HashMap::new();
    for chunk in base_ids.chunks(IN_CLAUSE_CHUNK) {
        let rows = image::Entity::find()
            .filter(image::Column::ProductId.is_in(chunk.iter().copied()))
            .order_by_asc(image::Column::CreatedAt)
            .all(conn)
            .await?;
        for row in rows {
            if let Some(product_id) = row.product_id {
                by_product.entry(product_id).or_default().push(row);
            }
        }
    }
    Ok(by_product)
}

async fn load_parameter_values<C>(
    conn: &C,
    base_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<product_parameter_value::Model>>, ServiceError>
where
    C: ConnectionTrait,
{
    let mut by_product: HashMap<Uuid, Vec<product_parameter_value::Model>> = HashMap::new();
    for chunk in base_ids.chunks(IN_CLAUSE_CHUNK) {
        let rows = product_parameter_value::Entity::find()
            .filter(product_parameter_value::Column::ProductId.is_in(chunk.iter().copied()))
            .all(conn)
            .await?;
        for row in rows {
            by_product.entry(row.product_id).or_default().push(row);
        }
    }
    Ok(by_product)
}

/// Inserts or refreshes the row for the pair and returns its persisted id.
async fn upsert_derived<C>(
    conn: &C,
    derived: DerivedProduct,
    now: DateTime<Utc>,
) -> Result<Uuid, ServiceError>
where
    C: ConnectionTrait,
{
    let (base_id, generator_id) = derived.pair();

    product::Entity::insert(derived.into_active_model(now))
        .on_conflict(
            OnConflict::columns([
                product::Column::BaseProductId,
                product::Column::GeneratorId,
            ])
            .update_columns([
                product::Column::Name,
                product::Column::Description,
                product::Column::Info,
                product::Column::Price,
                product::Column::Count,
                product::Column::EntityId,
                product::Column::CategoryId,
                product::Column::BrandId,
                product::Column::Slug,
                product::Column::Keywords,
                product::Column::ImageId,
                product::Column::Generated,
                product::Column::Generatable,
                product::Column::Show,
                product::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    // On conflict the existing id survives, so read it back by the pair
    let persisted = product::Entity::find()
        .filter(product::Column::BaseProductId.eq(base_id))
        .filter(product::Column::GeneratorId.eq(generator_id))
        .one(conn)
        .await?
        .ok_or_else(|| {
            ServiceError::InternalError(format!(
                "derived product for base {} / generator {} missing after upsert",
                base_id, generator_id
            ))
        })?;

    Ok(persisted.id)
}

async fn copy_images<C>(
    conn: &C,
    images: &[image::Model],
    derived_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    if images.is_empty() {
        return Ok(());
    }

    let copies = images.iter().map(|source| image::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(source.name.clone()),
        image_url: Set(source.image_url.clone()),
        product_id: Set(Some(derived_id)),
        category_id: Set(None),
        created_at: Set(now),
    });

    image::Entity::insert_many(copies)
        .on_conflict(
            OnConflict::columns([image::Column::ProductId, image::Column::ImageUrl])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

async fn copy_parameter_values<C>(
    conn: &C,
    values: &[product_parameter_value::Model],
    derived_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    if values.is_empty() {
        return Ok(());
    }

    let copies = values
        .iter()
        .map(|source| product_parameter_value::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(derived_id),
            parameter_id: Set(source.parameter_id),
            text_value: Set(source.text_value.clone()),
            bool_value: Set(source.bool_value),
            selectable_value: Set(source.selectable_value.clone()),
            created_at: Set(now),
        });

    product_parameter_value::Entity::insert_many(copies)
        .on_conflict(
            OnConflict::columns([
                product_parameter_value::Column::ProductId,
                product_parameter_value::Column::ParameterId,
            ])
            .update_columns([
                product_parameter_value::Column::BoolValue,
                product_parameter_value::Column::TextValue,
                product_parameter_value::Column::SelectableValue,
            ])
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn base(name: &str, price: Option<&str>, keywords: &[&str]) -> product::Model {
        let now = Utc::now();
        product::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: Some(format!("{name} description")),
            info: Some("fits all trims".to_string()),
            price: price.map(str::to_string),
            count: Some("4".to_string()),
            position: None,
            code: Some("C-1".to_string()),
            category_id: Some(Uuid::new_v4()),
            brand_id: Some(Uuid::new_v4()),
            entity_id: None,
            image_id: Some(Uuid::new_v4()),
            slug: Some(name.to_lowercase().replace(' ', "-")),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            generatable: true,
            generated: false,
            show: false,
            base_product_id: None,
            generator_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn generator(name: &str, price: Option<&str>, keywords: &[&str]) -> catalog_entity::Model {
        let now = Utc::now();
        catalog_entity::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            parent_id: Some(Uuid::new_v4()),
            description: Some(format!("for {name}")),
            priority: Some("1".to_string()),
            image_id: Some(Uuid::new_v4()),
            entity_slug: Some(name.to_lowercase()),
            show: true,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            price: price.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    // ==================== Price Tests ====================

    #[rstest]
    #[case(Some("100"), Some("250"), "350")]
    #[case(Some("abc"), Some("250"), "250")]
    #[case(Some("100"), Some("abc"), "100")]
    #[case(None, Some("7"), "7")]
    #[case(Some(" 12 "), Some("3"), "3")]
    #[case(Some("+12"), Some(""), "12")]
    #[case(Some("-5"), Some("5"), "0")]
    #[case(Some("12.5"), Some("1"), "1")]
    fn merges_prices(#[case] base: Option<&str>, #[case] gen: Option<&str>, #[case] expected: &str) {
        assert_eq!(merge_price(base, gen), expected);
    }

    #[test]
    fn price_sum_saturates() {
        let max = i64::MAX.to_string();
        assert_eq!(merge_price(Some(&max), Some("1")), max);
    }

    // ==================== Keyword Tests ====================

    #[test]
    fn merges_keywords_without_duplicates() {
        let merged = merge_keywords(
            &StringList::from(["red", "suv"]),
            &StringList::from(["suv", "2024"]),
        );
        assert_eq!(merged, StringList::from(["red", "suv", "2024"]));
    }

    #[test]
    fn merge_drops_duplicates_inside_one_side() {
        let merged = merge_keywords(&StringList::from(["a", "a"]), &StringList::default());
        assert_eq!(merged, StringList::from(["a"]));
    }

    // ==================== Derivation Tests ====================

    #[test]
    fn derives_fields_from_both_sides() {
        let b = base("Seat Cover", Some("100"), &["red", "suv"]);
        let g = generator("Tiggo 7", Some("250"), &["suv", "2024"]);

        let derived = derive_product(&b, &g);

        assert_eq!(derived.name, "Seat Cover Tiggo 7");
        assert_eq!(derived.description, "Seat Cover description for Tiggo 7");
        assert_eq!(derived.price, "350");
        assert_eq!(derived.slug, "seat-cover_tiggo 7");
        assert_eq!(derived.keywords, StringList::from(["red", "suv", "2024"]));
        assert_eq!(derived.info, b.info);
        assert_eq!(derived.count, b.count);
        assert_eq!(derived.category_id, b.category_id);
        assert_eq!(derived.brand_id, b.brand_id);
        assert_eq!(derived.image_id, g.image_id);
        assert_eq!(derived.pair(), (b.id, g.id));
    }

    #[test]
    fn derived_row_is_flagged_generated_and_shown() {
        let b = base("Mat", Some("1"), &[]);
        let g = generator("Dena", None, &[]);
        let now = Utc::now();

        let model = derive_product(&b, &g).into_active_model(now);

        assert_eq!(model.generated, Set(true));
        assert_eq!(model.generatable, Set(false));
        assert_eq!(model.show, Set(true));
        assert_eq!(model.entity_id, Set(Some(g.id)));
        assert_eq!(model.base_product_id, Set(Some(b.id)));
    }

    #[test]
    fn missing_text_joins_with_bare_separator() {
        let mut b = base("Mat", None, &[]);
        b.description = None;
        b.slug = None;
        let mut g = generator("Dena", None, &[]);
        g.description = None;

        let derived = derive_product(&b, &g);
        assert_eq!(derived.description, " ");
        assert_eq!(derived.slug, "_dena");
        assert_eq!(derived.price, "0");
    }

    #[test]
    fn plan_is_generator_major() {
        let bases = vec![base("A", None, &[]), base("B", None, &[])];
        let generators = vec![generator("X", None, &[]), generator("Y", None, &[])];

        let names: Vec<String> = plan_generation(&bases, &generators)
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["A X", "B X", "A Y", "B Y"]);
    }

    #[test]
    fn colliding_names_in_plan_are_rejected() {
        // "Cover Pro" + "X" and "Cover" + "Pro X" both yield "Cover Pro X"
        let bases = vec![base("Cover Pro", None, &[]), base("Cover", None, &[])];
        let generators = vec![generator("X", None, &[]), generator("Pro X", None, &[])];

        let plan = plan_generation(&bases, &generators);
        let err = check_plan_collisions(&plan).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(msg) if msg.contains("Cover Pro X")));
    }

    #[test]
    fn distinct_names_pass_collision_check() {
        let plan = plan_generation(
            &[base("A", None, &[]), base("B", None, &[])],
            &[generator("X", None, &[])],
        );
        assert!(check_plan_collisions(&plan).is_ok());
    }

    proptest! {
        #[test]
        fn merged_keywords_are_unique_and_cover_inputs(
            left in proptest::collection::vec("[a-d]{1,2}", 0..8),
            right in proptest::collection::vec("[a-d]{1,2}", 0..8),
        ) {
            let merged = merge_keywords(&StringList(left.clone()), &StringList(right.clone()));

            let unique: HashSet<&String> = merged.iter().collect();
            prop_assert_eq!(unique.len(), merged.len());
            for keyword in left.iter().chain(right.iter()) {
                prop_assert!(merged.0.contains(keyword));
            }
        }

        #[test]
        fn numeric_prices_add_up(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
            let merged = merge_price(Some(&a.to_string()), Some(&b.to_string()));
            prop_assert_eq!(merged, (a + b).to_string());
        }

        #[test]
        fn plan_size_is_product_of_inputs(n in 0usize..6, m in 0usize..6) {
            let bases: Vec<_> = (0..n).map(|i| base(&format!("B{i}"), None, &[])).collect();
            let generators: Vec<_> = (0..m).map(|i| generator(&format!("G{i}"), None, &[])).collect();
            prop_assert_eq!(plan_generation(&bases, &generators).len(), n * m);
        }
    }
}
