//! SeaORM implementation of ReadingRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::to_column;
use crate::domain::{DomainResult, MeterReading, NewReading, ReadingRepository};
use crate::infrastructure::database::entities::meter_reading;
use crate::support::money::{from_scaled, QUANTITY_SCALE};

pub(super) fn entity_to_domain(m: meter_reading::Model) -> MeterReading {
    MeterReading {
        id: m.id,
        account_id: m.account_id,
        meter_id: m.meter_id,
        reading_date: m.reading_date,
        previous_value: from_scaled(m.previous_value, QUANTITY_SCALE),
        current_value: from_scaled(m.current_value, QUANTITY_SCALE),
        channel: m.channel.into(),
        submitted_by: m.submitted_by,
        bill_id: m.bill_id,
        recorded_at: m.recorded_at,
    }
}

pub(super) fn active_model(r: NewReading) -> DomainResult<meter_reading::ActiveModel> {
    Ok(meter_reading::ActiveModel {
        account_id: Set(r.account_id),
        meter_id: Set(r.meter_id),
        reading_date: Set(r.reading_date),
        previous_value: Set(to_column(r.previous_value, QUANTITY_SCALE, "previous_reading")?),
        current_value: Set(to_column(r.current_value, QUANTITY_SCALE, "current_reading")?),
        channel: Set(r.channel.into()),
        submitted_by: Set(r.submitted_by),
        bill_id: Set(r.bill_id),
        recorded_at: Set(Utc::now()),
        ..Default::default()
    })
}

pub struct SeaOrmReadingRepository {
    db: DatabaseConnection,
}

impl SeaOrmReadingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReadingRepository for SeaOrmReadingRepository {
    async fn record(&self, r: NewReading) -> DomainResult<MeterReading> {
        let saved = active_model(r)?.insert(&self.db).await?;
        Ok(entity_to_domain(saved))
    }

    async fn find_by_account(&self, account_id: i32) -> DomainResult<Vec<MeterReading>> {
        let models = meter_reading::Entity::find()
            .filter(meter_reading::Column::AccountId.eq(account_id))
            .order_by_desc(meter_reading::Column::ReadingDate)
            .order_by_desc(meter_reading::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Account, AccountRepository, ConnectionStatus, Department, Jurisdiction, SubmissionChannel,
        TariffCategory,
    };
    use crate::infrastructure::database::repositories::testing::test_db;
    use crate::infrastructure::database::repositories::SeaOrmAccountRepository;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn records_and_lists_newest_first() {
        let db = test_db().await;
        let accounts = SeaOrmAccountRepository::new(db.clone());
        accounts
            .save(&Account {
                id: 5,
                jurisdiction: Jurisdiction::new("South", "Shelbyville"),
                department: Department::Water,
                category: TariffCategory::Residential,
                meter_id: "WTR-5".into(),
                connection_status: ConnectionStatus::Active,
            })
            .await
            .unwrap();
        assert!(accounts.find_by_id(5).await.unwrap().is_some());

        let repo = SeaOrmReadingRepository::new(db);
        for (day, prev, cur) in [(3, dec!(10.5), dec!(20.125)), (17, dec!(20.125), dec!(31))] {
            repo.record(NewReading {
                account_id: 5,
                meter_id: "WTR-5".into(),
                reading_date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
                previous_value: prev,
                current_value: cur,
                channel: SubmissionChannel::FieldAgent,
                submitted_by: Some("agent-1".into()),
                bill_id: None,
            })
            .await
            .unwrap();
        }

        let readings = repo.find_by_account(5).await.unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].reading_date.format("%d").to_string(), "17");
        assert_eq!(readings[1].consumption(), dec!(9.625));
        assert_eq!(readings[1].channel, SubmissionChannel::FieldAgent);
        assert!(repo.find_by_account(6).await.unwrap().is_empty());
    }
}
