pub mod base;
pub mod scenario;

pub use base::{load_base_data, BaseData, ServiceRecord, YearMonth, Zone, ZoneMetric};
pub use scenario::{ScenarioParameters, SimulationScenario, StrategyType};
