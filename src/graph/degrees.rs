//! compute degrees in and out from a csmat

use anyhow::anyhow;

use hdrhistogram::Histogram;
use sprs::CsMatI;

/// first component is in, second component is out!
#[derive(Copy, Clone, Debug)]
pub struct Degree {
    pub d_in: u32,
    pub d_out: u32,
}

impl Degree {
    fn new(d_in: u32, d_out: u32) -> Self {
        Degree { d_in, d_out }
    }
    /// get degree in
    pub fn degree_in(&self) -> u32 {
        self.d_in
    }
    /// get degree out
    pub fn degree_out(&self) -> u32 {
        self.d_out
    }
} // end of impl Degree

/// returns a vector of 2-uple consisting of degrees (in, out)
/// fist component is in, second component is out!
/// Self loops are not taken into account.
pub(crate) fn get_csmat_degrees<F>(csmat: &CsMatI<F, usize>) -> Vec<Degree>
where
    F: Copy + Default,
{
    //
    assert!(csmat.is_csr());
    //
    let (nb_row, _) = csmat.shape();
    let mut degrees = (0..nb_row)
        .map(|_| Degree::new(0, 0))
        .collect::<Vec<Degree>>();
    //
    for (_val, (i, j)) in csmat.iter() {
        if i != j {
            degrees[i].d_out += 1; // one more out for i
            degrees[j].d_in += 1; // one more in for j
        }
    }
    degrees
} // end of get_csmat_degrees

//
/// get out degrees quantiles from a csr mat, quantiles are logged at info level.
/// The upper quantiles show how many nodes are hubs whose neighbourhood a walk would rather
/// subsample with `max_neighbours`.
pub fn get_degree_quant_from_csrmat<F>(csmat: &CsMatI<F, usize>) -> anyhow::Result<Histogram<u32>>
where
    F: Copy + Default,
{
    let degrees = get_csmat_degrees(csmat);
    let mut degree_histogram = match Histogram::<u32>::new(3) {
        Ok(histo) => histo,
        Err(err) => {
            log::error!("histogram creation failed : {}", err);
            return Err(anyhow!("histogram creation failed"));
        }
    };
    for d in &degrees {
        degree_histogram.record(d.d_out.into())?;
    }
    //
    let nbslot = 10;
    let mut qs = Vec::<f64>::with_capacity(nbslot + 2);
    for i in 1..nbslot {
        let q = i as f64 / nbslot as f64;
        qs.push(q);
    }
    qs.push(0.99);
    qs.push(0.999);
    for q in qs {
        log::info!(
            "fraction : {:.3e}, out degree : {}",
            q,
            degree_histogram.value_at_quantile(q)
        );
    }
    //
    Ok(degree_histogram)
} // end of get_degree_quant_from_csrmat

// end of mod tests
