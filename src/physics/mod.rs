pub mod thermal;

pub use thermal::{
    solve_steady_state_heat, SolveStatus, SteadyStateThermal, ThermalConfig, ThermalSolution,
    HEAT_FLUX_FIELD, TEMPERATURE_FIELD,
};
