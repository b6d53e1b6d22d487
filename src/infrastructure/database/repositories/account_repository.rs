//! SeaORM implementation of AccountRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{sea_query::OnConflict, DatabaseConnection, EntityTrait, Set};
use tracing::debug;

use crate::domain::{Account, AccountRepository, DomainResult, Jurisdiction};
use crate::infrastructure::database::entities::account;

fn entity_to_domain(m: account::Model) -> Account {
    Account {
        id: m.id,
        jurisdiction: Jurisdiction::new(m.region, m.locality),
        department: m.department.into(),
        category: m.category.into(),
        meter_id: m.meter_id,
        connection_status: m.connection_status.into(),
    }
}

pub struct SeaOrmAccountRepository {
    db: DatabaseConnection,
}

impl SeaOrmAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Mirror an account from the account registry, replacing the stored copy.
    pub async fn save(&self, a: &Account) -> DomainResult<()> {
        let now = Utc::now();
        let model = account::ActiveModel {
            id: Set(a.id),
            region: Set(a.jurisdiction.region.clone()),
            locality: Set(a.jurisdiction.locality.clone()),
            department: Set(a.department.into()),
            category: Set(a.category.into()),
            meter_id: Set(a.meter_id.clone()),
            connection_status: Set(a.connection_status.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        account::Entity::insert(model)
            .on_conflict(
                OnConflict::column(account::Column::Id)
                    .update_columns([
                        account::Column::Region,
                        account::Column::Locality,
                        account::Column::Department,
                        account::Column::Category,
                        account::Column::MeterId,
                        account::Column::ConnectionStatus,
                        account::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        debug!(account_id = a.id, "Account saved");
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Account>> {
        let model = account::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(entity_to_domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionStatus, Department, TariffCategory};
    use crate::infrastructure::database::repositories::testing::test_db;

    #[tokio::test]
    async fn save_and_find_account() {
        let repo = SeaOrmAccountRepository::new(test_db().await);
        let mut acc = Account {
            id: 42,
            jurisdiction: Jurisdiction::new("North", "Springfield"),
            department: Department::Gas,
            category: TariffCategory::Commercial,
            meter_id: "GAS-42".into(),
            connection_status: ConnectionStatus::Active,
        };
        repo.save(&acc).await.unwrap();
        assert_eq!(repo.find_by_id(42).await.unwrap(), Some(acc.clone()));

        acc.connection_status = ConnectionStatus::Suspended;
        repo.save(&acc).await.unwrap();
        let stored = repo.find_by_id(42).await.unwrap().unwrap();
        assert_eq!(stored.connection_status, ConnectionStatus::Suspended);

        assert!(repo.find_by_id(43).await.unwrap().is_none());
    }
}
