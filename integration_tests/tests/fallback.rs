use std::sync::Arc;

use climate_sim::{
    run_simulation, ModelConfig, PolicyStrength, SimulationEngine, SimulationParameters,
};

const UNKNOWN_IDS: [&str; 5] = ["", "unknown_challenge", "REDUCE_EMISSIONS", "reforest", "ocean"];

fn assert_fallback(engine: &SimulationEngine) {
    for policy in PolicyStrength::ALL {
        for (solar, wind) in [(0.0, 0.0), (65.0, 45.0), (100.0, 0.0), (30.0, 95.0)] {
            let params = SimulationParameters::new(solar, wind, policy);
            let canonical = engine.run("reduce_emissions", &params);
            for id in UNKNOWN_IDS {
                assert_eq!(engine.run(id, &params), canonical, "id {id:?}");
            }
        }
    }
}

#[test]
fn unknown_challenges_use_emissions_model() {
    assert_fallback(&SimulationEngine::builtin());
}

#[test]
fn fallback_holds_with_variance_enabled() {
    let mut config = ModelConfig::default();
    config.variance.enabled = true;
    config.variance.amplitude = 0.2;
    config.variance.seed = 99;
    assert_fallback(&SimulationEngine::new(Arc::new(config)));
}

#[test]
fn free_function_uses_builtin_config() {
    let params = SimulationParameters::default();
    assert_eq!(
        run_simulation("anything", &params),
        SimulationEngine::builtin().run("reduce_emissions", &params)
    );
}
