//! Route export for plotting.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::models::{Instance, Solution};

/// Writes every route as `<route> <x> <y>` lines.
///
/// Each route is bracketed by the depot, and the output ends with a
/// `-1 <x> <y>` line marking the depot.
///
/// # Examples
///
/// ```
/// use u_cvrp::io::write_routes;
/// use u_cvrp::models::{Instance, Node, Solution};
///
/// let instance = Instance::new(
///     10,
///     vec![Node::depot(0.0, 0.0), Node::new(1, 2.0, 3.0, 1)],
/// );
/// let sol = Solution::from_paths(vec![vec![1]], vec![]);
///
/// let mut out = Vec::new();
/// write_routes(&sol, &instance, &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "0 0 0\n0 2 3\n0 0 0\n-1 0 0\n");
/// ```
pub fn write_routes<W: Write>(solution: &Solution, instance: &Instance, mut out: W) -> io::Result<()> {
    let depot = instance.depot();
    for (r, route) in solution.routes.iter().enumerate() {
        writeln!(out, "{} {} {}", r, depot.x(), depot.y())?;
        for &c in &route.path {
            let node = instance.node(c);
            writeln!(out, "{} {} {}", r, node.x(), node.y())?;
        }
        writeln!(out, "{} {} {}", r, depot.x(), depot.y())?;
    }
    writeln!(out, "-1 {} {}", depot.x(), depot.y())?;
    out.flush()
}

/// Writes the routes of `solution` to the file at `path`.
pub fn export_solution<P: AsRef<Path>>(solution: &Solution, instance: &Instance, path: P) -> io::Result<()> {
    let file = File::create(path)?;
    write_routes(solution, instance, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;

    #[test]
    fn test_two_routes() {
        let instance = Instance::new(
            10,
            vec![
                Node::depot(1.5, 2.0),
                Node::new(1, 4.0, 0.0, 5),
                Node::new(2, 7.0, 1.0, 5),
                Node::new(3, 0.0, 9.0, 5),
            ],
        );
        let sol = Solution::from_paths(vec![vec![1, 2], vec![3]], vec![]);
        let mut out = Vec::new();
        write_routes(&sol, &instance, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "0 1.5 2", "0 4 0", "0 7 1", "0 1.5 2", "1 1.5 2", "1 0 9", "1 1.5 2", "-1 1.5 2",
            ]
        );
    }

    #[test]
    fn test_empty_solution_writes_sentinel() {
        let instance = Instance::new(10, vec![Node::depot(3.0, 4.0)]);
        let mut out = Vec::new();
        write_routes(&Solution::default(), &instance, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "-1 3 4\n");
    }

    #[test]
    fn test_export_to_file() {
        let instance = Instance::new(10, vec![Node::depot(0.0, 0.0), Node::new(1, 1.0, 1.0, 1)]);
        let sol = Solution::from_paths(vec![vec![1]], vec![]);
        let path = std::env::temp_dir().join(format!("u_cvrp_export_{}.txt", std::process::id()));
        export_solution(&sol, &instance, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.ends_with("-1 0 0\n"));
    }
}
