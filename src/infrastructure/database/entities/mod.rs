//! Database entities module

pub mod account;
pub mod bill;
pub mod meter_reading;
pub mod tariff_set;
pub mod tariff_slab;

pub use account::Entity as AccountEntity;
pub use bill::Entity as BillEntity;
pub use meter_reading::Entity as MeterReadingEntity;
pub use tariff_set::Entity as TariffSetEntity;
pub use tariff_slab::Entity as TariffSlabEntity;
