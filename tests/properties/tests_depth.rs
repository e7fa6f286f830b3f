//! Depth over generated graphs.

use proptest::prelude::*;
use stylable::{DependencyGraph, DepthCalculator, Result};

/// Every module is a stylesheet; no views.
#[derive(Debug)]
struct Graph {
    edges: Vec<Vec<usize>>,
}

impl DependencyGraph for Graph {
    type Module = usize;

    fn dependencies(&self, module: &usize) -> Result<Vec<usize>> {
        Ok(self.edges[*module].clone())
    }

    fn importers(&self, _module: &usize) -> Vec<usize> {
        Vec::new()
    }

    fn is_stylesheet(&self, _module: &usize) -> bool {
        true
    }

    fn base_path(&self, module: &usize) -> String {
        module.to_string()
    }
}

/// Edges only point to lower indices, so the graph is acyclic.
fn dag() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..12).prop_flat_map(|size| {
        (0..size)
            .map(|index| prop::collection::vec(0..index.max(1), 0..=index.min(3)))
            .collect::<Vec<_>>()
    })
}

/// Arbitrary edges, cycles and self loops included.
fn any_graph() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..10).prop_flat_map(|size| {
        prop::collection::vec(prop::collection::vec(0..size, 0..4), size)
    })
}

proptest! {
    #[test]
    fn prop_importer_is_deeper_than_its_imports(edges in dag()) {
        let size = edges.len();
        let mut calculator = DepthCalculator::new(Graph { edges: edges.clone() });
        for module in 0..size {
            let depth = calculator.depth(&module).unwrap();
            prop_assert!(depth >= 1);
            for dependency in &edges[module] {
                prop_assert!(depth > calculator.depth(dependency).unwrap());
            }
        }
    }

    #[test]
    fn prop_cycles_terminate_with_bounded_depth(edges in any_graph()) {
        let size = edges.len();
        let mut calculator = DepthCalculator::new(Graph { edges });
        for module in 0..size {
            let depth = calculator.depth(&module).unwrap();
            prop_assert!((1..=size).contains(&depth));
        }
    }
}
