//! Matching verification

use anyhow::{bail, Result};

use crate::grid::{DistMatrix, DistVec};

use super::label::UNMATCHED;

/// Check that the two matching arrays describe a valid matching of `a`:
/// every partner id in range, `mate_row2col` and `mate_col2row` mutually
/// consistent, and every matched pair an actual edge of the graph.
///
/// Returns the number of matched pairs.
///
/// # Errors
///
/// Returns an error describing the first violation found.
pub fn verify_matching(
    a: &DistMatrix,
    mate_row2col: &DistVec<i64>,
    mate_col2row: &DistVec<i64>,
) -> Result<i64> {
    if mate_row2col.len() != a.nrows() || mate_col2row.len() != a.ncols() {
        bail!(
            "mate array lengths ({}, {}) do not match matrix dimensions ({}, {})",
            mate_row2col.len(),
            mate_col2row.len(),
            a.nrows(),
            a.ncols()
        );
    }

    let r2c = mate_row2col.to_vec();
    let c2r = mate_col2row.to_vec();

    let mut matched = 0i64;
    for (r, &c) in r2c.iter().enumerate() {
        if c == UNMATCHED {
            continue;
        }
        let r = r as i64;
        if c < 0 || c >= a.ncols() {
            bail!("row {r} matched to out-of-range column {c}");
        }
        if c2r[c as usize] != r {
            bail!(
                "inconsistent pair: mate_row2col[{r}] = {c} but mate_col2row[{c}] = {}",
                c2r[c as usize]
            );
        }
        if !a.has_edge(r, c) {
            bail!("matched pair ({r}, {c}) is not an edge of the graph");
        }
        matched += 1;
    }

    // The reverse direction may not point at rows the forward map disowns.
    for (c, &r) in c2r.iter().enumerate() {
        if r == UNMATCHED {
            continue;
        }
        if r < 0 || r >= a.nrows() {
            bail!("column {c} matched to out-of-range row {r}");
        }
        if r2c[r as usize] != c as i64 {
            bail!(
                "inconsistent pair: mate_col2row[{c}] = {r} but mate_row2col[{r}] = {}",
                r2c[r as usize]
            );
        }
    }

    Ok(matched)
}
