use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use crate::algorithms;
use crate::graph::{Edge, Graph};

/// Errors raised while reading or writing instance and assignment files.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid graph: {0}")]
    Graph(#[from] algorithms::Error),

    #[error("vertex {0} has no room")]
    MissingVertex(usize),
}

fn parse_token<T: FromStr>(token: Option<&str>, line: usize, what: &str) -> Result<T, Error> {
    let token = token.ok_or_else(|| Error::Parse { line, message: format!("missing {what}") })?;
    token.parse().map_err(|_| Error::Parse { line, message: format!("invalid {what} {token:?}") })
}

fn expect_end<'a>(mut tokens: impl Iterator<Item = &'a str>, line: usize) -> Result<(), Error> {
    match tokens.next() {
        Some(token) => Err(Error::Parse { line, message: format!("unexpected token {token:?}") }),
        None => Ok(()),
    }
}

/// Parse an instance: the number of students, the stress budget and then one
/// `i j happiness stress` line per edge.
pub fn parse_input(content: &str) -> Result<(Graph, f64), Error> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(index, text)| (index + 1, text))
        .filter(|(_, text)| !text.trim().is_empty());

    let (line, text) = lines.next().ok_or(Error::Parse { line: 1, message: "missing number of students".into() })?;
    let mut tokens = text.split_whitespace();
    let num_of_vertices: usize = parse_token(tokens.next(), line, "number of students")?;
    expect_end(tokens, line)?;

    let (line, text) = lines.next().ok_or(Error::Parse { line: line + 1, message: "missing stress budget".into() })?;
    let mut tokens = text.split_whitespace();
    let stress_budget: f64 = parse_token(tokens.next(), line, "stress budget")?;
    expect_end(tokens, line)?;
    if !stress_budget.is_finite() || stress_budget < 0.0 {
        return Err(Error::Parse { line, message: format!("stress budget {stress_budget} must be a non-negative number") });
    }

    let mut edges = Vec::new();
    for (line, text) in lines {
        let mut tokens = text.split_whitespace();
        let vertex1 = parse_token(tokens.next(), line, "first student")?;
        let vertex2 = parse_token(tokens.next(), line, "second student")?;
        let happiness = parse_token(tokens.next(), line, "happiness")?;
        let stress = parse_token(tokens.next(), line, "stress")?;
        expect_end(tokens, line)?;
        edges.push(Edge::new(vertex1, vertex2, happiness, stress));
    }

    Ok((Graph::from_edges(num_of_vertices, edges)?, stress_budget))
}

/// Read an instance file and output the Graph struct along with its stress budget.
pub fn read_input_file(file_path: &Path) -> Result<(Graph, f64), Error> {
    parse_input(&fs::read_to_string(file_path)?)
}

/// Write an instance in the format understood by `read_input_file`.
pub fn write_input_file(graph: &Graph, stress_budget: f64, file_path: &Path) -> Result<(), Error> {
    let mut file = BufWriter::new(File::create(file_path)?);
    writeln!(file, "{}", graph.len())?;
    writeln!(file, "{stress_budget}")?;
    for edge in graph.edges() {
        writeln!(file, "{} {} {} {}", edge.vertex1, edge.vertex2, edge.happiness, edge.stress)?;
    }
    file.flush()?;
    Ok(())
}

/// Write the room of every student to a file, one `student room` line each.
pub fn write_output_file(rooms: &[usize], file_path: &Path) -> Result<(), Error> {
    let mut file = BufWriter::new(File::create(file_path)?);
    for (vertex, room) in rooms.iter().enumerate() {
        writeln!(file, "{} {}", vertex, room)?;
    }
    file.flush()?;
    Ok(())
}

/// Read an assignment file written by `write_output_file` for a graph of `num_of_vertices` students.
pub fn read_output_file(file_path: &Path, num_of_vertices: usize) -> Result<Vec<usize>, Error> {
    let content = fs::read_to_string(file_path)?;
    let mut rooms = vec![None; num_of_vertices];

    for (index, text) in content.lines().enumerate() {
        if text.trim().is_empty() {
            continue;
        }
        let line = index + 1;
        let mut tokens = text.split_whitespace();
        let vertex: usize = parse_token(tokens.next(), line, "student")?;
        let room: usize = parse_token(tokens.next(), line, "room")?;
        expect_end(tokens, line)?;

        let slot = rooms.get_mut(vertex).ok_or_else(|| Error::Parse {
            line,
            message: format!("student {vertex} is out of range"),
        })?;
        if slot.replace(room).is_some() {
            return Err(Error::Parse { line, message: format!("student {vertex} is listed twice") });
        }
    }

    rooms
        .into_iter()
        .enumerate()
        .map(|(vertex, room)| room.ok_or(Error::MissingVertex(vertex)))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use itertools::assert_equal;
    use tempfile::tempdir;
    use super::*;

    fn create_mock_file(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let file_path = dir.join(filename);
        let mut file = File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file_path
    }

    #[test]
    fn test_read_input_file() -> Result<(), Error> {
        // Arrange
        let temp_dir = tempdir()?;
        let content = "4\n12.5\n0 1 8 2\n\n2 3 1.25 1\n1 2 0 4.5\n";
        let file_path = create_mock_file(temp_dir.path(), "small.in", content);

        // Act
        let (graph, stress_budget) = read_input_file(&file_path)?;

        // Assert
        assert_eq!(graph.len(), 4);
        assert_eq!(stress_budget, 12.5);
        assert_equal(graph.edges().iter().cloned(), [
            Edge::new(0, 1, 8.0, 2.0),
            Edge::new(2, 3, 1.25, 1.0),
            Edge::new(1, 2, 0.0, 4.5),
        ]);

        Ok(())
    }

    #[test]
    fn test_parse_input_errors() {
        assert!(matches!(parse_input(""), Err(Error::Parse { line: 1, .. })));
        assert!(matches!(parse_input("3\n"), Err(Error::Parse { line: 2, .. })));
        assert!(matches!(parse_input("3\n-1\n"), Err(Error::Parse { line: 2, .. })));
        assert!(matches!(parse_input("3\n10\n0 1 x 1\n"), Err(Error::Parse { line: 3, .. })));
        assert!(matches!(parse_input("3\n10\n0 1 1\n"), Err(Error::Parse { line: 3, .. })));
        assert!(matches!(parse_input("3\n10\n0 1 1 1 1\n"), Err(Error::Parse { line: 3, .. })));
        assert!(matches!(
            parse_input("3\n10\n0 3 1 1\n"),
            Err(Error::Graph(algorithms::Error::VertexOutOfRange { vertex: 3, len: 3 }))
        ));
    }

    #[test]
    fn test_input_file_round_trip() -> Result<(), Error> {
        // Arrange
        let temp_dir = tempdir()?;
        let file_path = temp_dir.path().join("round_trip.in");
        let graph = Graph::from_edges(3, vec![Edge::new(0, 2, 3.125, 0.5), Edge::new(1, 2, 0.0, 7.0)])?;

        // Act
        write_input_file(&graph, 9.75, &file_path)?;
        let (read_back, stress_budget) = read_input_file(&file_path)?;

        // Assert
        assert_eq!(read_back.len(), 3);
        assert_eq!(read_back.edges(), graph.edges());
        assert_eq!(stress_budget, 9.75);

        Ok(())
    }

    #[test]
    fn test_output_file_round_trip() -> Result<(), Error> {
        // Arrange
        let temp_dir = tempdir()?;
        let file_path = temp_dir.path().join("rooms.out");
        let rooms = [2, 0, 0, 1];

        // Act
        write_output_file(&rooms, &file_path)?;
        let read_back = read_output_file(&file_path, 4)?;

        // Assert
        assert_eq!(fs::read_to_string(&file_path)?, "0 2\n1 0\n2 0\n3 1\n");
        assert_eq!(read_back, rooms);

        Ok(())
    }

    #[test]
    fn test_read_output_file_errors() -> Result<(), Error> {
        // Arrange
        let temp_dir = tempdir()?;
        let missing = create_mock_file(temp_dir.path(), "missing.out", "0 0\n2 1\n");
        let twice = create_mock_file(temp_dir.path(), "twice.out", "0 0\n0 1\n");
        let out_of_range = create_mock_file(temp_dir.path(), "range.out", "5 0\n");

        // Act and Assert
        assert!(matches!(read_output_file(&missing, 3), Err(Error::MissingVertex(1))));
        assert!(matches!(read_output_file(&twice, 2), Err(Error::Parse { line: 2, .. })));
        assert!(matches!(read_output_file(&out_of_range, 2), Err(Error::Parse { line: 1, .. })));

        Ok(())
    }
}
