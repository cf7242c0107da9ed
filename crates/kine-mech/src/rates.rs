//! Rate and acceleration substitution symbols (u1, u2, a1, a2).
//!
//! The derivation works with opaque time-derivative nodes; the numeric
//! compiler wants independent symbols. `RateSubs` owns the fresh symbols
//! and builds the two substitution maps the pipeline applies once all
//! differentiation is done: the velocity-level map (theta' -> u) and the
//! acceleration-level map (theta' -> u plus theta'' -> a).

use kine_expr::{Expr, SubsMap, SymTable, Symbol};

use crate::error::Result;

pub struct RateSubs {
    pub u1: Symbol,
    pub u2: Symbol,
    pub a1: Symbol,
    pub a2: Symbol,
    theta1_dot: Expr,
    theta2_dot: Expr,
    theta1_ddot: Expr,
    theta2_ddot: Expr,
}

impl RateSubs {
    pub fn new(table: &mut SymTable, theta1: Symbol, theta2: Symbol) -> Result<Self> {
        Ok(Self {
            u1: table.sym("u1")?,
            u2: table.sym("u2")?,
            a1: table.sym("a1")?,
            a2: table.sym("a2")?,
            theta1_dot: Expr::deriv(theta1, 1, table)?,
            theta2_dot: Expr::deriv(theta2, 1, table)?,
            theta1_ddot: Expr::deriv(theta1, 2, table)?,
            theta2_ddot: Expr::deriv(theta2, 2, table)?,
        })
    }

    /// {theta1' -> u1, theta2' -> u2}; for velocity-level expressions and
    /// kinetic energy, which never contain second derivatives.
    pub fn velocity_map(&self) -> SubsMap {
        SubsMap::new(vec![
            (self.theta1_dot.clone(), Expr::from(self.u1)),
            (self.theta2_dot.clone(), Expr::from(self.u2)),
        ])
    }

    /// Velocity map plus {theta1'' -> a1, theta2'' -> a2}; for
    /// acceleration-level expressions.
    pub fn acceleration_map(&self) -> SubsMap {
        SubsMap::new(vec![
            (self.theta1_ddot.clone(), Expr::from(self.a1)),
            (self.theta2_ddot.clone(), Expr::from(self.a2)),
            (self.theta1_dot.clone(), Expr::from(self.u1)),
            (self.theta2_dot.clone(), Expr::from(self.u2)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_map_leaves_second_derivatives_behind() {
        let mut table = SymTable::new();
        let theta1 = table.dynamic("theta1").unwrap();
        let theta2 = table.dynamic("theta2").unwrap();
        let rates = RateSubs::new(&mut table, theta1, theta2).unwrap();

        let acc_like = Expr::Deriv { sym: theta1, order: 2 };
        // the velocity map does not cover order 2: checked application fails
        assert!(rates
            .velocity_map()
            .apply_checked(&acc_like, &table)
            .is_err());
        // the acceleration map covers it
        let out = rates
            .acceleration_map()
            .apply_checked(&acc_like, &table)
            .unwrap();
        assert_eq!(out, Expr::from(rates.a1));
    }
}
