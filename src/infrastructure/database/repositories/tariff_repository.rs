//! SeaORM implementation of TariffRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use super::to_column;
use crate::domain::{
    DomainError, DomainResult, Jurisdiction, TariffRepository, TariffScope, TariffSet, TariffSlab,
};
use crate::infrastructure::database::entities::{tariff_set, tariff_slab};
use crate::support::money::{from_scaled, MONEY_SCALE, PERCENT_SCALE, QUANTITY_SCALE, RATE_SCALE};

fn slab_to_domain(s: tariff_slab::Model) -> TariffSlab {
    TariffSlab {
        from_units: from_scaled(s.from_units, QUANTITY_SCALE),
        to_units: s.to_units.map(|v| from_scaled(v, QUANTITY_SCALE)),
        rate_per_unit: from_scaled(s.rate_per_unit, RATE_SCALE),
    }
}

fn entity_to_domain(set: tariff_set::Model, slabs: Vec<tariff_slab::Model>) -> TariffSet {
    TariffSet {
        id: set.id,
        name: set.name,
        scope: TariffScope {
            jurisdiction: Jurisdiction::new(set.region, set.locality),
            department: set.department.into(),
            category: set.category.into(),
        },
        fixed_charge: from_scaled(set.fixed_charge, MONEY_SCALE),
        tax_percentage: from_scaled(i64::from(set.tax_percentage), PERCENT_SCALE),
        slabs: slabs.into_iter().map(slab_to_domain).collect(),
    }
}

pub struct SeaOrmTariffRepository {
    db: DatabaseConnection,
}

impl SeaOrmTariffRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Store a new tariff set with its slabs. A newer set for the same scope
    /// supersedes older ones. Returns the assigned id.
    pub async fn save(&self, set: &TariffSet) -> DomainResult<i32> {
        let tax = i32::try_from(to_column(set.tax_percentage, PERCENT_SCALE, "tax_percentage")?)
            .map_err(|_| {
                DomainError::Validation(format!(
                    "tax_percentage value {} is out of range",
                    set.tax_percentage
                ))
            })?;
        let now = Utc::now();

        let txn = self.db.begin().await?;
        let saved = tariff_set::ActiveModel {
            name: Set(set.name.clone()),
            region: Set(set.scope.jurisdiction.region.clone()),
            locality: Set(set.scope.jurisdiction.locality.clone()),
            department: Set(set.scope.department.into()),
            category: Set(set.scope.category.into()),
            fixed_charge: Set(to_column(set.fixed_charge, MONEY_SCALE, "fixed_charge")?),
            tax_percentage: Set(tax),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for slab in &set.slabs {
            let to_units = match slab.to_units {
                Some(v) => Some(to_column(v, QUANTITY_SCALE, "to_units")?),
                None => None,
            };
            tariff_slab::ActiveModel {
                tariff_set_id: Set(saved.id),
                from_units: Set(to_column(slab.from_units, QUANTITY_SCALE, "from_units")?),
                to_units: Set(to_units),
                rate_per_unit: Set(to_column(slab.rate_per_unit, RATE_SCALE, "rate_per_unit")?),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;

        info!(
            tariff_set_id = saved.id,
            name = %set.name,
            jurisdiction = %set.scope.jurisdiction,
            department = %set.scope.department,
            category = %set.scope.category,
            slabs = set.slabs.len(),
            "Tariff set saved"
        );
        Ok(saved.id)
    }
}

#[async_trait]
impl TariffRepository for SeaOrmTariffRepository {
    async fn find_by_scope(&self, scope: &TariffScope) -> DomainResult<Option<TariffSet>> {
        let department: tariff_set::Department = scope.department.into();
        let category: tariff_set::TariffCategory = scope.category.into();

        let set = tariff_set::Entity::find()
            .filter(tariff_set::Column::Region.eq(scope.jurisdiction.region.as_str()))
            .filter(tariff_set::Column::Locality.eq(scope.jurisdiction.locality.as_str()))
            .filter(tariff_set::Column::Department.eq(department))
            .filter(tariff_set::Column::Category.eq(category))
            .filter(tariff_set::Column::IsActive.eq(true))
            .order_by_desc(tariff_set::Column::Id)
            .one(&self.db)
            .await?;

        let Some(set) = set else {
            return Ok(None);
        };

        let slabs = tariff_slab::Entity::find()
            .filter(tariff_slab::Column::TariffSetId.eq(set.id))
            .order_by_asc(tariff_slab::Column::FromUnits)
            .all(&self.db)
            .await?;

        Ok(Some(entity_to_domain(set, slabs)))
    }
}
