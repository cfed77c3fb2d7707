//! The scenario consumed by the calculation core.
//!
//! A [`ScenarioInput`] describes one vehicle operated over an analysis period. It is read from a
//! TOML file (see [`crate::input`]) or built in code, validated once and then only ever read.
use crate::error::{TcoResult, ensure_valid};
use crate::id::define_id_type;
use crate::input::deserialise_proportion;
use crate::strategy::CostDomain;
use crate::units::{
    Dimensionless, Distance, Emissions, EmissionsPerEnergy, Energy, EnergyPerDistance, Money,
    MoneyPerDistance, MoneyPerEmissions, MoneyPerEnergy, MoneyPerPower, Power, Temperature,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

define_id_type! {ImplementationID}

/// The implementation variant used when a scenario doesn't pick one
pub const DEFAULT_IMPLEMENTATION: &str = "default";

impl Default for ImplementationID {
    fn default() -> Self {
        Self::new(DEFAULT_IMPLEMENTATION)
    }
}

/// The drivetrain of a vehicle
#[derive(
    PartialEq,
    Eq,
    Hash,
    Copy,
    Clone,
    Debug,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VehicleType {
    /// Battery-electric truck
    BatteryElectric,
    /// Diesel truck
    Diesel,
}

impl VehicleType {
    /// Whether the vehicle draws its energy from a battery
    pub fn is_electric(self) -> bool {
        self == Self::BatteryElectric
    }

    /// Maintenance cost multiplier relative to a diesel baseline
    pub fn default_maintenance_multiplier(self) -> Dimensionless {
        match self {
            Self::BatteryElectric => Dimensionless(0.7),
            Self::Diesel => Dimensionless(1.0),
        }
    }

    /// Increase in consumption per degree below the reference temperature
    pub fn default_temperature_sensitivity(self) -> Dimensionless {
        match self {
            Self::BatteryElectric => Dimensionless(0.01),
            Self::Diesel => Dimensionless(0.002),
        }
    }

    /// Tailpipe CO2 per unit of energy (tonnes per kWh or per litre)
    pub fn default_emission_factor(self) -> EmissionsPerEnergy {
        match self {
            Self::BatteryElectric => EmissionsPerEnergy(0.0),
            Self::Diesel => EmissionsPerEnergy(0.00268),
        }
    }
}

/// How the vehicle purchase is paid for
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinancingMethod {
    /// The net purchase price is paid up front
    #[default]
    Cash,
    /// A down payment followed by annual loan repayments
    Loan,
}

fn default_base_year() -> u32 {
    2025
}

fn default_load_factor() -> Dimensionless {
    Dimensionless(0.5)
}

fn default_temperature() -> Temperature {
    Temperature(20.0)
}

/// A complete TCO scenario for a single vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    /// Name of the scenario
    pub name: String,
    /// The vehicle being costed
    pub vehicle: VehicleParameters,
    /// How the vehicle is used
    pub operational: OperationalParameters,
    /// Discounting, prices and financing
    pub economic: EconomicParameters,
    /// Parameters for the individual cost domains
    #[serde(default)]
    pub costs: CostParameters,
    /// Implementation variant to use for each cost domain
    #[serde(default)]
    pub implementations: IndexMap<CostDomain, ImplementationID>,
}

/// Characteristics of the vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleParameters {
    /// Display name of the vehicle
    pub name: String,
    /// Drivetrain type
    pub vehicle_type: VehicleType,
    /// Purchase price before subsidies
    pub purchase_price: Money,
    /// Subsidy deducted from the purchase price
    #[serde(default)]
    pub purchase_subsidy: Money,
    /// Energy use
    pub energy: EnergyParameters,
    /// Traction battery (battery-electric vehicles only)
    #[serde(default)]
    pub battery: Option<BatteryParameters>,
}

/// Parameters for energy consumption and demand charges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyParameters {
    /// Consumption per km at zero load and reference temperature
    pub base_consumption: EnergyPerDistance,
    /// Relative increase in consumption at full load
    #[serde(default)]
    pub load_sensitivity: Dimensionless,
    /// Relative increase in consumption per degree below the reference temperature
    #[serde(default)]
    pub temperature_sensitivity: Option<Dimensionless>,
    /// Temperature below which consumption increases
    #[serde(default = "default_temperature")]
    pub reference_temperature: Temperature,
    /// Share of consumption recovered by regenerative braking (battery-electric only)
    #[serde(default, deserialize_with = "deserialise_proportion")]
    pub regenerative_braking_credit: Dimensionless,
    /// Tailpipe CO2 per unit of energy
    #[serde(default)]
    pub emission_factor: Option<EmissionsPerEnergy>,
    /// Peak charging demand (battery-electric only)
    #[serde(default)]
    pub peak_demand_kw: Power,
    /// Demand charge per kW of peak demand per month
    #[serde(default)]
    pub demand_charge_per_kw_month: MoneyPerPower,
}

/// Parameters of the traction battery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryParameters {
    /// Usable battery capacity
    pub capacity_kwh: Energy,
    /// Cost of a replacement battery per kWh at the start of the analysis period
    pub replacement_cost_per_kwh: MoneyPerEnergy,
    /// Expected battery life
    pub life_years: u32,
    /// Annual decline in battery prices
    #[serde(default, deserialize_with = "deserialise_proportion")]
    pub replacement_cost_decline: Dimensionless,
}

/// How the vehicle is operated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalParameters {
    /// Distance driven each year
    #[serde(alias = "annual_mileage_km")]
    pub annual_distance_km: Distance,
    /// Distance driven in each year of the analysis period, overriding `annual_distance_km`
    #[serde(default)]
    pub distance_schedule_km: Option<Vec<Distance>>,
    /// Number of years analysed
    pub analysis_period_years: u32,
    /// Calendar year of the first analysis year
    #[serde(default = "default_base_year")]
    pub base_year: u32,
    /// Average payload as a proportion of maximum payload
    #[serde(
        default = "default_load_factor",
        deserialize_with = "deserialise_proportion"
    )]
    pub load_factor: Dimensionless,
    /// Average ambient temperature in degrees Celsius
    #[serde(default = "default_temperature")]
    pub ambient_temperature: Temperature,
}

/// Discounting, prices and financing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicParameters {
    /// Real discount rate applied to future costs
    pub discount_rate: Dimensionless,
    /// General inflation applied to fees, insurance and maintenance
    #[serde(default)]
    pub inflation_rate: Dimensionless,
    /// Price per unit of energy (kWh or litre) in the first year
    #[serde(alias = "fuel_price")]
    pub energy_price: MoneyPerEnergy,
    /// Annual escalation of the energy price
    #[serde(default)]
    pub energy_price_escalation: Dimensionless,
    /// Price per tonne of CO2 in the first year
    #[serde(default)]
    pub carbon_price: MoneyPerEmissions,
    /// Annual escalation of the carbon price
    #[serde(default)]
    pub carbon_price_escalation: Dimensionless,
    /// How the vehicle is paid for
    #[serde(default)]
    pub financing: FinancingParameters,
}

/// Loan terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingParameters {
    /// Cash or loan
    pub method: FinancingMethod,
    /// Proportion of the net price paid up front when financed with a loan
    #[serde(deserialize_with = "deserialise_proportion")]
    pub down_payment_fraction: Dimensionless,
    /// Length of the loan
    pub loan_term_years: u32,
    /// Annual interest rate of the loan
    pub interest_rate: Dimensionless,
}

impl Default for FinancingParameters {
    fn default() -> Self {
        Self {
            method: FinancingMethod::Cash,
            down_payment_fraction: Dimensionless(0.2),
            loan_term_years: 5,
            interest_rate: Dimensionless(0.07),
        }
    }
}

/// Parameters for each of the cost domains
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CostParameters {
    /// Maintenance and repair
    pub maintenance: MaintenanceParameters,
    /// Charging or fuelling infrastructure
    pub infrastructure: InfrastructureParameters,
    /// Insurance
    pub insurance: InsuranceParameters,
    /// Registration
    pub registration: RegistrationParameters,
    /// Road user charges and levies
    pub taxes: TaxParameters,
    /// Depreciation and residual value
    pub residual: ResidualValueParameters,
}

/// Maintenance and repair costs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceParameters {
    /// Cost per km for a diesel baseline vehicle
    pub cost_per_km: MoneyPerDistance,
    /// Annual fixed cost (servicing, inspections)
    pub annual_fixed_cost: Money,
    /// Annual growth of per-km costs as the vehicle ages
    pub age_escalation: Dimensionless,
    /// Overrides the vehicle-type multiplier
    pub type_multiplier: Option<Dimensionless>,
}

/// Charging or depot fuelling infrastructure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfrastructureParameters {
    /// Capital cost of a depot charger
    pub charger_capital_cost: Money,
    /// Number of vehicles sharing a charger
    pub vehicles_per_charger: u32,
    /// Economic life of the charger
    pub charger_lifetime_years: u32,
    /// Annual charger maintenance as a proportion of its capital cost
    pub maintenance_fraction: Dimensionless,
    /// Annual cost of depot fuelling facilities (diesel)
    pub depot_annual_cost: Money,
}

impl Default for InfrastructureParameters {
    fn default() -> Self {
        Self {
            charger_capital_cost: Money(0.0),
            vehicles_per_charger: 1,
            charger_lifetime_years: 10,
            maintenance_fraction: Dimensionless(0.0),
            depot_annual_cost: Money(0.0),
        }
    }
}

/// Insurance premiums
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsuranceParameters {
    /// Annual premium as a proportion of the vehicle's market value
    pub rate: Dimensionless,
}

/// Registration fees
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationParameters {
    /// Annual registration fee in the first year
    pub annual_fee: Money,
}

/// Road user charges and other levies
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxParameters {
    /// Distance-based road user charge
    pub road_user_charge_per_km: MoneyPerDistance,
    /// Other flat annual taxes
    pub annual_levy: Money,
}

/// Depreciation of the vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidualValueParameters {
    /// Proportion of market value lost each year
    #[serde(deserialize_with = "deserialise_proportion")]
    pub depreciation_rate: Dimensionless,
}

impl Default for ResidualValueParameters {
    fn default() -> Self {
        Self {
            depreciation_rate: Dimensionless(0.15),
        }
    }
}

impl EnergyParameters {
    /// Temperature sensitivity, falling back to the vehicle type's default
    pub fn temperature_sensitivity(&self, vehicle_type: VehicleType) -> Dimensionless {
        self.temperature_sensitivity
            .unwrap_or_else(|| vehicle_type.default_temperature_sensitivity())
    }

    /// Emission factor, falling back to the vehicle type's default
    pub fn emission_factor(&self, vehicle_type: VehicleType) -> EmissionsPerEnergy {
        self.emission_factor
            .unwrap_or_else(|| vehicle_type.default_emission_factor())
    }
}

/// Growth factor `(1 + rate)^year`
pub fn escalation_factor(rate: Dimensionless, year: u32) -> Dimensionless {
    (Dimensionless(1.0) + rate).powi(year as i32)
}

/// Check that a rate is finite and greater than -1 so that `(1 + rate)^t` stays positive
fn check_rate(parameter: &str, rate: Dimensionless) -> TcoResult<()> {
    ensure_valid!(
        rate.is_finite() && rate > Dimensionless(-1.0),
        parameter,
        "must be a finite number greater than -1 (got {})",
        rate.0
    );

    Ok(())
}

/// Check that a proportion lies in [0, 1]
fn check_proportion(parameter: &str, value: Dimensionless) -> TcoResult<()> {
    ensure_valid!(
        (0.0..=1.0).contains(&value.0),
        parameter,
        "must be between 0 and 1 (got {})",
        value.0
    );

    Ok(())
}

/// Check that a quantity is finite and non-negative
fn check_non_negative(parameter: &str, value: f64) -> TcoResult<()> {
    ensure_valid!(
        value.is_finite() && value >= 0.0,
        parameter,
        "must be a finite number greater than or equal to zero (got {value})"
    );

    Ok(())
}

impl ScenarioInput {
    /// The vehicle's drivetrain
    pub fn vehicle_type(&self) -> VehicleType {
        self.vehicle.vehicle_type
    }

    /// Number of years in the analysis period
    pub fn period(&self) -> u32 {
        self.operational.analysis_period_years
    }

    /// Check that `year` lies within the analysis period
    pub fn check_year(&self, year: u32) -> TcoResult<()> {
        ensure_valid!(
            year < self.period(),
            "year",
            "year {year} is outside the analysis period of {} years",
            self.period()
        );

        Ok(())
    }

    /// Distance driven in the given year
    pub fn annual_distance(&self, year: u32) -> Distance {
        match &self.operational.distance_schedule_km {
            Some(schedule) => schedule
                .get(year as usize)
                .copied()
                .unwrap_or(Distance(0.0)),
            None => self.operational.annual_distance_km,
        }
    }

    /// Total distance driven over the analysis period
    pub fn lifetime_distance(&self) -> Distance {
        (0..self.period()).map(|year| self.annual_distance(year)).sum()
    }

    /// General inflation factor for the given year
    pub fn inflation_factor(&self, year: u32) -> Dimensionless {
        escalation_factor(self.economic.inflation_rate, year)
    }

    /// Purchase price net of subsidies
    pub fn net_purchase_price(&self) -> Money {
        self.vehicle.purchase_price - self.vehicle.purchase_subsidy
    }

    /// Market value of the vehicle after `age` years of depreciation
    pub fn vehicle_value(&self, age: u32) -> Money {
        let retained = Dimensionless(1.0) - self.costs.residual.depreciation_rate;
        self.vehicle.purchase_price * retained.powi(age as i32)
    }

    /// Energy consumed in the given year.
    ///
    /// Base consumption is adjusted for load, for temperatures below the reference temperature
    /// and, for battery-electric vehicles, for regenerative braking.
    pub fn energy_consumption(&self, year: u32) -> Energy {
        let energy = &self.vehicle.energy;
        let vehicle_type = self.vehicle_type();

        let load_adjustment =
            Dimensionless(1.0) + energy.load_sensitivity * self.operational.load_factor;
        let degrees_below =
            (energy.reference_temperature.0 - self.operational.ambient_temperature.0).max(0.0);
        let temperature_adjustment = Dimensionless(1.0)
            + energy.temperature_sensitivity(vehicle_type) * Dimensionless(degrees_below);
        let regen_adjustment = if vehicle_type.is_electric() {
            Dimensionless(1.0) - energy.regenerative_braking_credit
        } else {
            Dimensionless(1.0)
        };

        let consumption = energy.base_consumption
            * (load_adjustment * temperature_adjustment * regen_adjustment);
        consumption * self.annual_distance(year)
    }

    /// Tailpipe emissions in the given year
    pub fn emissions(&self, year: u32) -> Emissions {
        self.vehicle.energy.emission_factor(self.vehicle_type()) * self.energy_consumption(year)
    }

    /// The implementation variant selected for `domain`
    pub fn implementation(&self, domain: CostDomain) -> ImplementationID {
        self.implementations
            .get(&domain)
            .cloned()
            .unwrap_or_default()
    }

    /// Check that the scenario's parameters are within range.
    ///
    /// Validation is a precondition of calculation: invalid scenarios are rejected, never
    /// repaired.
    pub fn validate(&self) -> TcoResult<()> {
        let period = self.period();
        ensure_valid!(
            period > 0,
            "analysis_period_years",
            "analysis period must be at least one year"
        );
        ensure_valid!(
            self.operational.base_year.checked_add(period).is_some(),
            "base_year",
            "base year {} is too large for an analysis period of {period} years",
            self.operational.base_year
        );

        // Distance
        check_non_negative(
            "annual_distance_km",
            self.operational.annual_distance_km.value(),
        )?;
        if let Some(schedule) = &self.operational.distance_schedule_km {
            ensure_valid!(
                schedule.len() == period as usize,
                "distance_schedule_km",
                "schedule has {} entries but the analysis period is {period} years",
                schedule.len()
            );
            for distance in schedule {
                check_non_negative("distance_schedule_km", distance.value())?;
            }
        }
        ensure_valid!(
            self.lifetime_distance() > Distance(0.0),
            "annual_distance_km",
            "lifetime distance must be greater than zero"
        );
        check_proportion("load_factor", self.operational.load_factor)?;
        ensure_valid!(
            self.operational.ambient_temperature.is_finite(),
            "ambient_temperature",
            "must be finite"
        );

        // Vehicle
        check_non_negative("purchase_price", self.vehicle.purchase_price.value())?;
        check_non_negative("purchase_subsidy", self.vehicle.purchase_subsidy.value())?;
        ensure_valid!(
            self.vehicle.purchase_subsidy <= self.vehicle.purchase_price,
            "purchase_subsidy",
            "subsidy cannot exceed the purchase price"
        );
        self.validate_energy()?;
        if let Some(battery) = &self.vehicle.battery {
            check_non_negative("battery.capacity_kwh", battery.capacity_kwh.value())?;
            check_non_negative(
                "battery.replacement_cost_per_kwh",
                battery.replacement_cost_per_kwh.value(),
            )?;
            ensure_valid!(
                battery.life_years > 0,
                "battery.life_years",
                "battery life must be at least one year"
            );
            check_proportion(
                "battery.replacement_cost_decline",
                battery.replacement_cost_decline,
            )?;
        }

        // Economics
        let economic = &self.economic;
        check_rate("discount_rate", economic.discount_rate)?;
        check_rate("inflation_rate", economic.inflation_rate)?;
        check_non_negative("energy_price", economic.energy_price.value())?;
        check_rate("energy_price_escalation", economic.energy_price_escalation)?;
        check_non_negative("carbon_price", economic.carbon_price.value())?;
        check_rate("carbon_price_escalation", economic.carbon_price_escalation)?;
        if economic.financing.method == FinancingMethod::Loan {
            let financing = &economic.financing;
            ensure_valid!(
                financing.loan_term_years > 0,
                "loan_term_years",
                "loan term must be at least one year"
            );
            check_proportion("down_payment_fraction", financing.down_payment_fraction)?;
            check_rate("interest_rate", financing.interest_rate)?;
        }

        self.validate_costs()
    }

    fn validate_energy(&self) -> TcoResult<()> {
        let energy = &self.vehicle.energy;
        ensure_valid!(
            energy.base_consumption.is_finite() && energy.base_consumption.value() > 0.0,
            "base_consumption",
            "must be a finite number greater than zero"
        );
        check_non_negative("load_sensitivity", energy.load_sensitivity.value())?;
        check_non_negative(
            "temperature_sensitivity",
            energy
                .temperature_sensitivity(self.vehicle_type())
                .value(),
        )?;
        check_proportion(
            "regenerative_braking_credit",
            energy.regenerative_braking_credit,
        )?;
        check_non_negative(
            "emission_factor",
            energy.emission_factor(self.vehicle_type()).value(),
        )?;
        check_non_negative("peak_demand_kw", energy.peak_demand_kw.value())?;
        check_non_negative(
            "demand_charge_per_kw_month",
            energy.demand_charge_per_kw_month.value(),
        )?;

        Ok(())
    }

    fn validate_costs(&self) -> TcoResult<()> {
        let costs = &self.costs;
        check_non_negative("maintenance.cost_per_km", costs.maintenance.cost_per_km.value())?;
        check_non_negative(
            "maintenance.annual_fixed_cost",
            costs.maintenance.annual_fixed_cost.value(),
        )?;
        check_rate("maintenance.age_escalation", costs.maintenance.age_escalation)?;
        if let Some(multiplier) = costs.maintenance.type_multiplier {
            check_non_negative("maintenance.type_multiplier", multiplier.value())?;
        }

        let infrastructure = &costs.infrastructure;
        check_non_negative(
            "infrastructure.charger_capital_cost",
            infrastructure.charger_capital_cost.value(),
        )?;
        ensure_valid!(
            infrastructure.vehicles_per_charger > 0,
            "infrastructure.vehicles_per_charger",
            "at least one vehicle must use each charger"
        );
        ensure_valid!(
            infrastructure.charger_lifetime_years > 0,
            "infrastructure.charger_lifetime_years",
            "charger lifetime must be at least one year"
        );
        check_non_negative(
            "infrastructure.maintenance_fraction",
            infrastructure.maintenance_fraction.value(),
        )?;
        check_non_negative(
            "infrastructure.depot_annual_cost",
            infrastructure.depot_annual_cost.value(),
        )?;

        check_non_negative("insurance.rate", costs.insurance.rate.value())?;
        check_non_negative(
            "registration.annual_fee",
            costs.registration.annual_fee.value(),
        )?;
        check_non_negative(
            "taxes.road_user_charge_per_km",
            costs.taxes.road_user_charge_per_km.value(),
        )?;
        check_non_negative("taxes.annual_levy", costs.taxes.annual_levy.value())?;
        check_proportion(
            "residual.depreciation_rate",
            costs.residual.depreciation_rate,
        )?;

        Ok(())
    }
}
