//! Connected-component decomposition.
//!
//! The spectral bisector assumes a connected input, so every recursion level
//! first splits its subgraph into components. BFS from the lowest unvisited
//! vertex keeps the component order deterministic.

use super::SparseGraph;

/// Finds the connected components of a graph.
///
/// Returns one sorted vector of local vertex ids per component; components
/// are ordered by their smallest member. Isolated vertices form singleton
/// components.
pub(crate) fn connected_components(graph: &SparseGraph) -> Vec<Vec<usize>> {
    let order = graph.order();
    let mut visited = vec![false; order];
    let mut components = Vec::new();
    let mut queue = Vec::new();
    for start in 0..order {
        if visited[start] {
            continue;
        }
        let mut component = Vec::new();
        visited[start] = true;
        queue.push(start);
        while let Some(v) = queue.pop() {
            component.push(v);
            for (nb, _) in graph.neighbors(v) {
                if !visited[nb] {
                    visited[nb] = true;
                    queue.push(nb);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }
    components
}
