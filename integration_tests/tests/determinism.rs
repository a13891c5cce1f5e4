mod common;

use climate_sim::{
    load_model_config_from_env, sweep, synergy_score, Challenge, PolicyStrength, SimulationEngine,
    SimulationOutcomes, SimulationParameters, SolutionDraft, SweepRequest,
};

fn grid() -> Vec<SimulationParameters> {
    let mut params = Vec::new();
    for policy in PolicyStrength::ALL {
        for solar in (0..=100).step_by(20) {
            for wind in (0..=100).step_by(20) {
                params.push(SimulationParameters::new(
                    f64::from(solar),
                    f64::from(wind),
                    policy,
                ));
            }
        }
    }
    params
}

fn run_all(engine: &SimulationEngine) -> Vec<SimulationOutcomes> {
    let mut outcomes = Vec::new();
    for challenge in Challenge::ALL {
        for params in grid() {
            outcomes.push(engine.run_challenge(challenge, &params));
        }
    }
    outcomes
}

#[test]
fn repeated_runs_match_with_builtin_config() {
    let first = run_all(&SimulationEngine::builtin());
    let second = run_all(&SimulationEngine::builtin());
    assert_eq!(first, second);
}

#[test]
fn repeated_runs_match_with_seeded_variance() {
    common::ensure_test_config();
    let (config, metadata) = load_model_config_from_env();
    assert!(config.variance.enabled);
    assert!(metadata.path().is_some());

    let engine = SimulationEngine::new(config.clone());
    let first = run_all(&engine);
    let second = run_all(&SimulationEngine::new(config));
    assert_eq!(first, second);
    assert_ne!(first, run_all(&SimulationEngine::builtin()));
}

#[test]
fn sweep_order_is_stable_across_runs() {
    let engine = SimulationEngine::builtin();
    let request = SweepRequest::new(Challenge::Reforestation, PolicyStrength::High, 5);
    let first = sweep(&engine, &request).expect("sweep");
    for _ in 0..3 {
        assert_eq!(first, sweep(&engine, &request).expect("sweep"));
    }
}

#[test]
fn persisted_solutions_audit_cleanly() -> anyhow::Result<()> {
    let engine = SimulationEngine::builtin();
    for challenge in Challenge::ALL {
        for params in grid() {
            let outcomes = engine.run_challenge(challenge, &params);
            let draft = SolutionDraft::compose("Audit", None, challenge, params, outcomes)?;
            let stored = serde_json::to_string(&draft)?;

            let restored: SolutionDraft = serde_json::from_str(&stored)?;
            restored.verify_synergy()?;
            assert_eq!(restored.synergy_score, synergy_score(&restored.outcomes));
        }
    }
    Ok(())
}
