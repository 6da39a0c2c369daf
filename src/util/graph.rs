use num_traits::Zero;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Add;

/// An undirected graph with symmetric edge weights over an ordered vertex
/// type. Vertices are registered implicitly by `add_edge`.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph<V, W>
where
    V: Ord,
{
    vertices: BTreeSet<V>,
    edges: BTreeMap<V, BTreeMap<V, W>>,
}

impl<V, W> Graph<V, W>
where
    V: Ord + Clone,
    W: Add<Output = W> + Ord + Zero + Clone,
{
    pub fn new() -> Self {
        Graph {
            vertices: BTreeSet::new(),
            edges: BTreeMap::new(),
        }
    }

    pub fn add_vertex(&mut self, vertex: V) {
        self.vertices.insert(vertex);
    }

    /// Inserts the edge in both directions.
    pub fn add_edge(&mut self, vertex1: V, vertex2: V, weight: W) {
        self.add_vertex(vertex1.clone());
        self.add_vertex(vertex2.clone());
        self.edges
            .entry(vertex1.clone())
            .or_insert_with(BTreeMap::new)
            .insert(vertex2.clone(), weight.clone());
        self.edges
            .entry(vertex2)
            .or_insert_with(BTreeMap::new)
            .insert(vertex1, weight);
    }

    pub fn vertices(&self) -> &BTreeSet<V> {
        &self.vertices
    }

    /// Least-cost path from `source` to `destination`, reconstructed from
    /// predecessor links. Minimum extraction is a linear scan over the
    /// unvisited vertices, which is good enough at the scale this graph is
    /// used at. Returns `None` if either endpoint is unknown or no path
    /// exists, and the single-vertex path if both endpoints coincide.
    pub fn shortest_path(&self, source: &V, destination: &V) -> Option<Vec<V>> {
        if !self.vertices.contains(source) || !self.vertices.contains(destination) {
            return None;
        }
        if source == destination {
            return Some(vec![source.clone()]);
        }

        let mut unvisited: BTreeSet<V> = self.vertices.clone();
        // absent key = infinite distance
        let mut distance: BTreeMap<V, W> = BTreeMap::new();
        let mut previous: BTreeMap<V, V> = BTreeMap::new();
        distance.insert(source.clone(), W::zero());

        while !unvisited.is_empty() {
            let current = match unvisited
                .iter()
                .filter(|v| distance.contains_key(*v))
                .min_by(|a, b| distance[*a].cmp(&distance[*b]))
                .cloned()
            {
                Some(v) => v,
                None => break, // every remaining vertex is unreachable
            };
            unvisited.remove(&current);

            if let Some(neighbours) = self.edges.get(&current) {
                for (neighbour, weight) in neighbours {
                    let candidate = distance[&current].clone() + weight.clone();
                    let improves = match distance.get(neighbour) {
                        Some(known) => candidate < *known,
                        None => true,
                    };
                    if improves {
                        distance.insert(neighbour.clone(), candidate);
                        previous.insert(neighbour.clone(), current.clone());
                    }
                }
            }
        }

        if !distance.contains_key(destination) {
            return None;
        }

        let mut path = vec![destination.clone()];
        let mut vertex = destination;
        while vertex != source {
            vertex = previous.get(vertex)?;
            path.push(vertex.clone());
        }
        path.reverse();
        Some(path)
    }
}

impl<V, W> Default for Graph<V, W>
where
    V: Ord + Clone,
    W: Add<Output = W> + Ord + Zero + Clone,
{
    fn default() -> Self {
        Graph::new()
    }
}
