// vetting-core/src/domain/graph/dag.rs

use crate::domain::error::DomainError;
use std::collections::{BTreeMap, HashMap, VecDeque};

pub struct GraphSolver;

impl GraphSolver {
    /// Orders rules along their prerequisites (Topological Sort with Layers).
    /// `graph` maps each rule name to the names it depends on.
    /// Layer N depends only on layers 0..N-1. Edges to names outside the graph
    /// are ignored; callers report unknown names separately.
    pub fn plan_execution(graph: &BTreeMap<String, Vec<String>>) -> Result<Vec<Vec<String>>, DomainError> {
        let mut in_degree: HashMap<&str, usize> = HashMap::new();
        let mut adj_list: HashMap<&str, Vec<&str>> = HashMap::new();

        for name in graph.keys() {
            in_degree.insert(name, 0);
            adj_list.insert(name, Vec::new());
        }

        for (name, deps) in graph {
            for dep in deps {
                if graph.contains_key(dep) {
                    adj_list.entry(dep).or_default().push(name);
                    *in_degree.entry(name).or_insert(0) += 1;
                }
            }
        }

        let mut layers: Vec<Vec<String>> = Vec::new();
        // BTreeMap key order keeps every layer deterministic
        let mut queue: VecDeque<&str> = graph
            .keys()
            .map(String::as_str)
            .filter(|name| in_degree.get(name) == Some(&0))
            .collect();

        let mut total_resolved = 0;

        while !queue.is_empty() {
            let mut current_layer = Vec::new();
            let layer_size = queue.len();

            for _ in 0..layer_size {
                if let Some(current) = queue.pop_front() {
                    current_layer.push(current.to_string());
                    total_resolved += 1;

                    if let Some(neighbors) = adj_list.get(current) {
                        for neighbor in neighbors {
                            if let Some(degree) = in_degree.get_mut(neighbor) {
                                *degree -= 1;
                                if *degree == 0 {
                                    queue.push_back(*neighbor);
                                }
                            }
                        }
                    }
                }
            }
            current_layer.sort();
            layers.push(current_layer);
        }

        if total_resolved != graph.len() {
            let mut stuck: Vec<&str> = in_degree
                .iter()
                .filter(|(_, degree)| **degree > 0)
                .map(|(name, _)| *name)
                .collect();
            stuck.sort();
            return Err(DomainError::CircularDependency(format!(
                "rule prerequisites {} (resolved {}/{} rules)",
                stuck.join(", "),
                total_resolved,
                graph.len()
            )));
        }

        Ok(layers)
    }
}
