//! Integration tests for extended cutting planes.

mod common;

use common::{assert_close, MockNlp, MockRelaxation};
use solver_oa::{CutSource, EcpCutGenerator, EcpSettings, RelaxationSolver};

#[test]
fn test_cuts_only_for_violated_rows() {
    let nlp = MockNlp::new();
    let mut ecp = EcpCutGenerator::new(EcpSettings::default());

    // g0 = 4 + 3.61 > 4 and g1 = 3.8 > 3
    let cuts = ecp.generate(&nlp, &[2.0, 1.9]).unwrap();
    assert_eq!(cuts.len(), 2);
    assert_eq!(cuts[0].source, CutSource::Constraint { row: 0 });
    assert_eq!(cuts[1].source, CutSource::Constraint { row: 1 });
    for cut in &cuts {
        assert!(cut.is_violated(&[2.0, 1.9], 1e-6));
    }

    // x0 * x1 <= 3 at (2, 1.9): 1.9 x0 + 2 x1 <= 3 + 3.8
    assert_close(cuts[1].upper, 6.8);

    // Only g0 = 4.25 is violated at (2, 0.5).
    let cuts = ecp.generate(&nlp, &[2.0, 0.5]).unwrap();
    assert_eq!(cuts.len(), 1);
    assert_eq!(cuts[0].source, CutSource::Constraint { row: 0 });

    assert!(ecp.generate(&nlp, &[1.0, 1.0]).unwrap().is_empty());
    assert_eq!(ecp.stats().rounds, 3);
    assert_eq!(ecp.stats().cuts_generated, 3);
}

#[test]
fn test_separate_until_feasible() {
    let nlp = MockNlp::new();
    let mut model = MockRelaxation::new().with_solution(&[2.0, 1.9]);
    model.resolve_script.push_back(vec![1.0, 1.0]);
    let mut ecp = EcpCutGenerator::new(EcpSettings::default());

    let cuts = ecp.separate(&nlp, &mut model).unwrap();

    assert_eq!(cuts.len(), 2);
    assert_eq!(model.num_rows(), 2);
    assert_eq!(model.basis.num_rows(), 2);
    assert_eq!(model.col_solution(), &[1.0, 1.0]);
    assert_eq!(ecp.stats().rounds, 2);
}

#[test]
fn test_separate_round_limit() {
    let nlp = MockNlp::new();
    // Without a scripted solve the box optimum (2, 2) is returned every round.
    let mut model = MockRelaxation::new().with_solution(&[2.0, 2.0]);
    let settings = EcpSettings {
        max_rounds: 2,
        ..EcpSettings::default()
    };
    let mut ecp = EcpCutGenerator::new(settings);

    let cuts = ecp.separate(&nlp, &mut model).unwrap();

    assert_eq!(ecp.stats().rounds, 2);
    assert_eq!(cuts.len(), 4);
    assert_eq!(model.num_rows(), 4);
}

#[test]
fn test_evaluation_failure() {
    let mut nlp = MockNlp::new();
    nlp.fail_eval = true;
    let mut ecp = EcpCutGenerator::new(EcpSettings::default());

    assert!(ecp.generate(&nlp, &[2.0, 1.9]).is_err());
}
