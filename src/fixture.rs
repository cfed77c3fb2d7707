//! Fixtures for tests

use crate::scenario::{
    BatteryParameters, CostParameters, EconomicParameters, EnergyParameters,
    FinancingParameters, InfrastructureParameters, InsuranceParameters, MaintenanceParameters,
    OperationalParameters, RegistrationParameters, ResidualValueParameters, ScenarioInput,
    TaxParameters, VehicleParameters, VehicleType,
};
use crate::units::{
    Dimensionless, Distance, Energy, EnergyPerDistance, Money, MoneyPerDistance,
    MoneyPerEmissions, MoneyPerEnergy, MoneyPerPower, Power, Temperature,
};
use indexmap::IndexMap;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!($result.unwrap_err().to_string(), $msg);
    };
}
pub(crate) use assert_error;

#[fixture]
pub fn operational() -> OperationalParameters {
    OperationalParameters {
        annual_distance_km: Distance(80_000.0),
        distance_schedule_km: None,
        analysis_period_years: 5,
        base_year: 2025,
        load_factor: Dimensionless(0.5),
        ambient_temperature: Temperature(20.0),
    }
}

/// Cost parameters shared by both vehicles
#[fixture]
pub fn cost_parameters() -> CostParameters {
    CostParameters {
        maintenance: MaintenanceParameters {
            cost_per_km: MoneyPerDistance(0.15),
            annual_fixed_cost: Money(2000.0),
            age_escalation: Dimensionless(0.0),
            type_multiplier: None,
        },
        infrastructure: InfrastructureParameters::default(),
        insurance: InsuranceParameters {
            rate: Dimensionless(0.03),
        },
        registration: RegistrationParameters {
            annual_fee: Money(1500.0),
        },
        taxes: TaxParameters {
            road_user_charge_per_km: MoneyPerDistance(0.05),
            annual_levy: Money(500.0),
        },
        residual: ResidualValueParameters::default(),
    }
}

fn economic(energy_price: f64) -> EconomicParameters {
    EconomicParameters {
        discount_rate: Dimensionless(0.07),
        inflation_rate: Dimensionless(0.0),
        energy_price: MoneyPerEnergy(energy_price),
        energy_price_escalation: Dimensionless(0.0),
        carbon_price: MoneyPerEmissions(50.0),
        carbon_price_escalation: Dimensionless(0.0),
        financing: FinancingParameters::default(),
    }
}

fn energy(base_consumption: f64) -> EnergyParameters {
    EnergyParameters {
        base_consumption: EnergyPerDistance(base_consumption),
        load_sensitivity: Dimensionless(0.2),
        temperature_sensitivity: None,
        reference_temperature: Temperature(20.0),
        regenerative_braking_credit: Dimensionless(0.0),
        emission_factor: None,
        peak_demand_kw: Power(0.0),
        demand_charge_per_kw_month: MoneyPerPower(0.0),
    }
}

/// A diesel truck driving 80,000 km a year for 5 years
#[fixture]
pub fn diesel_scenario(
    operational: OperationalParameters,
    cost_parameters: CostParameters,
) -> ScenarioInput {
    ScenarioInput {
        name: "Diesel".into(),
        vehicle: VehicleParameters {
            name: "Diesel truck".into(),
            vehicle_type: VehicleType::Diesel,
            purchase_price: Money(300_000.0),
            purchase_subsidy: Money(0.0),
            energy: energy(0.3),
            battery: None,
        },
        operational,
        economic: economic(1.5),
        costs: cost_parameters,
        implementations: IndexMap::new(),
    }
}

/// A battery-electric truck driving 80,000 km a year for 5 years
#[fixture]
pub fn electric_scenario(
    operational: OperationalParameters,
    mut cost_parameters: CostParameters,
) -> ScenarioInput {
    cost_parameters.infrastructure = InfrastructureParameters {
        charger_capital_cost: Money(100_000.0),
        vehicles_per_charger: 2,
        charger_lifetime_years: 10,
        maintenance_fraction: Dimensionless(0.02),
        depot_annual_cost: Money(0.0),
    };

    ScenarioInput {
        name: "Electric".into(),
        vehicle: VehicleParameters {
            name: "Battery-electric truck".into(),
            vehicle_type: VehicleType::BatteryElectric,
            purchase_price: Money(500_000.0),
            purchase_subsidy: Money(0.0),
            energy: energy(1.2),
            battery: Some(BatteryParameters {
                capacity_kwh: Energy(500.0),
                replacement_cost_per_kwh: MoneyPerEnergy(150.0),
                life_years: 8,
                replacement_cost_decline: Dimensionless(0.0),
            }),
        },
        operational,
        economic: economic(0.25),
        costs: cost_parameters,
        implementations: IndexMap::new(),
    }
}
