//! src/instance.rs
//!
//! Representeert een onveranderlijke instantie van het gewogen K-set-cover
//! probleem: rijen, gewogen kolommen en de dekkingsrelatie in beide richtingen
//! (`row_covers` en `col_entries`). De buurt van elke kolom wordt eenmalig bij
//! het laden afgeleid. Ondersteunt het parsen van het OR-library `scp`-formaat.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use thiserror::Error;

/// Fouten die optreden bij het opbouwen of inlezen van een instantie.
/// Een instantie die een van deze fouten oplevert wordt nooit (gedeeltelijk) teruggegeven.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("failed to read instance: {0}")]
    Io(#[from] io::Error),
    #[error("unexpected end of input while reading {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("invalid integer token '{token}' while reading {expected}")]
    InvalidToken { token: String, expected: &'static str },
    #[error("instance must have at least one row and one column (rows={rows}, columns={columns})")]
    EmptyDimension { rows: usize, columns: usize },
    #[error("expected {expected} column weights, found {found}")]
    WeightCount { expected: usize, found: usize },
    #[error("column {column} has non-positive weight {weight}")]
    NonPositiveWeight { column: usize, weight: i64 },
    #[error("row {row} references column {column}, outside [1, {num_columns}]")]
    ColumnOutOfRange { row: usize, column: i64, num_columns: usize },
    #[error("row {row} lists column {column} more than once")]
    DuplicateColumn { row: usize, column: usize },
    #[error("row {row} is not covered by any column")]
    UncoveredRow { row: usize },
    #[error("incidence count mismatch: {row_view} from rows, {column_view} from columns")]
    IncidenceMismatch { row_view: usize, column_view: usize },
}

/// Een gewogen set-cover instantie. Intern zijn alle indices 0-gebaseerd;
/// extern (bestanden, rapportage) worden kolommen 1-gebaseerd genummerd.
#[derive(Clone, Debug)]
pub struct Instance {
    /// `weights[c]` is het (strikt positieve) gewicht van kolom `c`.
    weights: Vec<u64>,
    /// `row_covers[r]` bevat de kolommen die rij `r` dekken.
    row_covers: Vec<Vec<usize>>,
    /// `col_entries[c]` bevat de rijen die kolom `c` dekt (inverse van `row_covers`).
    col_entries: Vec<Vec<usize>>,
    /// `neighbourhood[c]`: alle andere kolommen die minstens één rij met `c` delen, gesorteerd.
    neighbourhood: Vec<Vec<usize>>,
    /// Totaal aantal (rij, kolom)-incidenties.
    incidences: usize,
}

impl Instance {
    /*────────── Constructors ──────────*/

    /// Bouwt een instantie op uit gewichten en, per rij, de 1-gebaseerde kolom-id's die haar dekken.
    ///
    /// Alle validatie gebeurt hier: dimensies, gewichten, bereik van de kolom-id's
    /// en lege rijen. `col_entries` wordt daarna in een aparte pass getransponeerd
    /// uit `row_covers`; de incidentie-telling van beide aanzichten moet overeenkomen.
    pub fn from_rows(
        num_columns: usize,
        weights: &[i64],
        rows: &[Vec<i64>],
    ) -> Result<Self, InstanceError> {
        let num_rows = rows.len();
        if num_rows == 0 || num_columns == 0 {
            return Err(InstanceError::EmptyDimension { rows: num_rows, columns: num_columns });
        }
        if weights.len() != num_columns {
            return Err(InstanceError::WeightCount { expected: num_columns, found: weights.len() });
        }

        let mut checked_weights = Vec::with_capacity(num_columns);
        for (c, &w) in weights.iter().enumerate() {
            if w <= 0 {
                return Err(InstanceError::NonPositiveWeight { column: c + 1, weight: w });
            }
            checked_weights.push(w as u64);
        }

        let mut row_covers: Vec<Vec<usize>> = Vec::with_capacity(num_rows);
        let mut seen = vec![usize::MAX; num_columns];

        for (r, ids) in rows.iter().enumerate() {
            if ids.is_empty() {
                return Err(InstanceError::UncoveredRow { row: r + 1 });
            }
            let mut covers = Vec::with_capacity(ids.len());
            for &id in ids {
                if id < 1 || id as u64 > num_columns as u64 {
                    return Err(InstanceError::ColumnOutOfRange {
                        row: r + 1,
                        column: id,
                        num_columns,
                    });
                }
                let c = (id - 1) as usize;
                if seen[c] == r {
                    return Err(InstanceError::DuplicateColumn { row: r + 1, column: c + 1 });
                }
                seen[c] = r;
                covers.push(c);
            }
            row_covers.push(covers);
        }

        let col_entries = transpose(&row_covers, num_columns);

        let row_view: usize = row_covers.iter().map(Vec::len).sum();
        let column_view: usize = col_entries.iter().map(Vec::len).sum();
        if row_view != column_view {
            return Err(InstanceError::IncidenceMismatch { row_view, column_view });
        }

        let neighbourhood = build_neighbourhood(&row_covers, &col_entries);

        Ok(Self {
            weights: checked_weights,
            row_covers,
            col_entries,
            neighbourhood,
            incidences: row_view,
        })
    }

    /// Parset het OR-library `scp`-formaat: `rows columns`, daarna `columns` gewichten,
    /// daarna per rij het aantal dekkende kolommen gevolgd door hun 1-gebaseerde id's.
    pub fn parse<R: Read>(reader: R) -> Result<Self, InstanceError> {
        let mut text = String::new();
        BufReader::new(reader).read_to_string(&mut text)?;
        let all: Vec<&str> = text.split_whitespace().collect();
        let mut tokens = all.iter().copied();

        let num_rows = next_count(&mut tokens, "row count")?;
        let num_columns = next_count(&mut tokens, "column count")?;
        if num_rows == 0 || num_columns == 0 {
            return Err(InstanceError::EmptyDimension { rows: num_rows, columns: num_columns });
        }

        // Aantallen uit het bestand zijn onbetrouwbaar: reserveer nooit meer dan er tokens over zijn.
        let mut weights = Vec::with_capacity(num_columns.min(tokens.len()));
        for _ in 0..num_columns {
            weights.push(next_int(&mut tokens, "column weight")?);
        }

        let mut rows = Vec::with_capacity(num_rows.min(tokens.len()));
        for _ in 0..num_rows {
            let count = next_count(&mut tokens, "row cover count")?;
            let mut ids = Vec::with_capacity(count.min(tokens.len()));
            for _ in 0..count {
                ids.push(next_int(&mut tokens, "covering column id")?);
            }
            rows.push(ids);
        }

        Self::from_rows(num_columns, &weights, &rows)
    }

    /// Opent en parset een instantiebestand.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, InstanceError> {
        let file = File::open(path)?;
        Self::parse(file)
    }

    /*────────── Getters ──────────*/

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.row_covers.len()
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.weights.len()
    }

    /// Geeft het gewicht van kolom `c` terug.
    #[inline]
    pub fn weight(&self, c: usize) -> u64 {
        self.weights[c]
    }

    /// Geeft de kolommen terug die rij `r` dekken.
    #[inline]
    pub fn row_covers(&self, r: usize) -> &[usize] {
        &self.row_covers[r]
    }

    /// Geeft de rijen terug die kolom `c` dekt.
    #[inline]
    pub fn col_entries(&self, c: usize) -> &[usize] {
        &self.col_entries[c]
    }

    /// Geeft de (gesorteerde, irreflexieve) buurt van kolom `c` terug.
    #[inline]
    pub fn neighbourhood(&self, c: usize) -> &[usize] {
        &self.neighbourhood[c]
    }

    /// Totaal aantal (rij, kolom)-incidenties.
    #[inline]
    pub fn incidences(&self) -> usize {
        self.incidences
    }

    /// Dichtheid van de incidentiematrix: incidenties / (rijen × kolommen).
    pub fn density(&self) -> f64 {
        self.incidences as f64 / (self.num_rows() as f64 * self.num_columns() as f64)
    }

    /// Kleinste aantal kolommen dat een rij dekt. Een K groter dan deze waarde is onhaalbaar.
    pub fn min_row_degree(&self) -> usize {
        self.row_covers.iter().map(Vec::len).min().unwrap_or(0)
    }
}

/// Bouwt de kolom-naar-rijen relatie op uit `row_covers`. Rijen staan per kolom oplopend.
fn transpose(row_covers: &[Vec<usize>], num_columns: usize) -> Vec<Vec<usize>> {
    let mut degree = vec![0usize; num_columns];
    for covers in row_covers {
        for &c in covers {
            if let Some(d) = degree.get_mut(c) {
                *d += 1;
            }
        }
    }
    let mut col_entries: Vec<Vec<usize>> = degree.iter().map(|&d| Vec::with_capacity(d)).collect();
    for (r, covers) in row_covers.iter().enumerate() {
        for &c in covers {
            if let Some(entries) = col_entries.get_mut(c) {
                entries.push(r);
            }
        }
    }
    col_entries
}

/// Leidt de buurt van elke kolom af: alle kolommen die via een gedeelde rij bereikbaar zijn.
fn build_neighbourhood(row_covers: &[Vec<usize>], col_entries: &[Vec<usize>]) -> Vec<Vec<usize>> {
    col_entries
        .iter()
        .enumerate()
        .map(|(c, rows)| {
            let mut nn: Vec<usize> = rows
                .iter()
                .flat_map(|&r| row_covers[r].iter().copied())
                .filter(|&other| other != c)
                .collect();
            nn.sort_unstable();
            nn.dedup();
            nn
        })
        .collect()
}

fn next_int<'a, I>(tokens: &mut I, expected: &'static str) -> Result<i64, InstanceError>
where
    I: Iterator<Item = &'a str>,
{
    let token = tokens.next().ok_or(InstanceError::UnexpectedEof { expected })?;
    token.parse().map_err(|_| InstanceError::InvalidToken {
        token: token.to_string(),
        expected,
    })
}

fn next_count<'a, I>(tokens: &mut I, expected: &'static str) -> Result<usize, InstanceError>
where
    I: Iterator<Item = &'a str>,
{
    let token = tokens.next().ok_or(InstanceError::UnexpectedEof { expected })?;
    token.parse().map_err(|_| InstanceError::InvalidToken {
        token: token.to_string(),
        expected,
    })
}
