/// Asserts that a score lies in the closed [0, 10] range.
#[macro_export]
macro_rules! assert_score {
    ($value:expr) => {
        let v: f64 = $value;
        assert!((0.0..=10.0).contains(&v), "Score {} is outside [0, 10]", v);
    };
}

/// Asserts that a component holds exactly `count` active bonds.
#[macro_export]
macro_rules! assert_degree {
    ($lab:expr, $component:expr, $count:expr) => {
        assert_eq!(
            $lab.bonds.get_bonds_for_component($component).len(),
            $count,
            "Bond count mismatch for {}",
            $component
        );
    };
}

/// Asserts that two floats agree to within 1e-9.
#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr) => {
        let (l, r): (f64, f64) = ($left, $right);
        assert!((l - r).abs() < 1e-9, "{} is not close to {}", l, r);
    };
}
