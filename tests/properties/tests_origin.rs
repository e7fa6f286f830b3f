//! Symbol origins over generated `-st-extends` graphs, cycles included.

use proptest::prelude::*;
use stylable::SymbolNamespace;

use crate::helpers::project::Project;

/// `edges[i]` are the files `f{i}` imports; its root extends the first one
/// and a helper class extends each of the others.
fn extends_graph() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..8).prop_flat_map(|size| {
        prop::collection::vec(prop::collection::vec(0..size, 0..3), size).prop_map(|edges| {
            edges
                .into_iter()
                .map(|mut targets| {
                    let mut seen = Vec::new();
                    targets.retain(|target| {
                        let fresh = !seen.contains(target);
                        seen.push(*target);
                        fresh
                    });
                    targets
                })
                .collect()
        })
    })
}

fn sources(edges: &[Vec<usize>]) -> Vec<(String, String)> {
    edges
        .iter()
        .enumerate()
        .map(|(index, targets)| {
            let mut source = String::new();
            for target in targets {
                source.push_str(&format!(
                    ":import {{ -st-from: './f{target}.st.css'; -st-default: F{target}; }}\n"
                ));
            }
            match targets.split_first() {
                Some((first, rest)) => {
                    source.push_str(&format!(".root {{ -st-extends: F{first}; }}\n"));
                    for target in rest {
                        source.push_str(&format!(".use{target} {{ -st-extends: F{target}; }}\n"));
                    }
                }
                None => source.push_str(".root {}\n"),
            }
            (format!("f{index}.st.css"), source)
        })
        .collect()
}

/// Where following root extends from `start` ends: the first file without
/// imports, or `None` when the walk loops.
fn expected_origin(edges: &[Vec<usize>], start: usize) -> Option<usize> {
    let mut visited = Vec::new();
    let mut current = start;
    loop {
        if visited.contains(&current) {
            return None;
        }
        visited.push(current);
        match edges[current].first() {
            Some(next) => current = *next,
            None => return Some(current),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_origin_follows_extends_and_terminates(edges in extends_graph()) {
        let files = sources(&edges);
        let refs: Vec<(&str, &str)> = files
            .iter()
            .map(|(name, source)| (name.as_str(), source.as_str()))
            .collect();
        let project = Project::new(&refs);

        for index in 0..edges.len() {
            let name = format!("f{index}.st.css");
            prop_assert!(project.stylable.transform(&name).is_ok());

            let meta = project.process(&name);
            let root = meta.symbols.get(SymbolNamespace::Main, "root").cloned().unwrap();
            let origin = project.stylable.resolve_symbol_origin(&root, &meta).unwrap();
            let reached = match origin {
                Some(origin) => {
                    prop_assert_eq!(origin.symbol.name().as_str(), "root");
                    Some(origin.meta.namespace.to_string())
                }
                None => None,
            };
            let expected = expected_origin(&edges, index).map(|target| format!("f{target}"));
            prop_assert_eq!(reached, expected);
        }
    }
}
