use ndarray as nd;
use num_complex::Complex64 as C64;
use nsdquad::{
    direct::DirectInhomogeneous,
    nsd::NSDInhomogeneous,
    packet::{ HagedornWavepacket, HyperCubicShape },
    params::Params,
    rule::{ GaussHermite, Weighting },
};

const NSD_ORDER: usize = 8;
const DIRECT_ORDERS: [usize; 3] = [10, 20, 40];

fn packets(eps: f64) -> anyhow::Result<(HagedornWavepacket, HagedornWavepacket)> {
    let c: nd::Array1<C64>
        = nd::array![C64::new(0.8, 0.0), C64::new(0.0, 0.5), C64::new(0.2, -0.2)];
    let bra_params = Params::from_real(
        &nd::array![0.0], &nd::array![0.5], &nd::array![[1.0]], &nd::array![[0.0]], 0.0)?;
    let ket_params = Params::from_real(
        &nd::array![0.2], &nd::array![0.3], &nd::array![[1.3]], &nd::array![[0.6]], 0.1)?;
    let bra = HagedornWavepacket::new(
        1, eps, vec![(bra_params, HyperCubicShape::new(&[3]), c.clone())])?;
    let ket = HagedornWavepacket::new(
        1, eps, vec![(ket_params, HyperCubicShape::new(&[3]), c)])?;
    Ok((bra, ket))
}

fn main() -> anyhow::Result<()> {
    let epsilons: nd::Array1<f64> = nd::Array1::logspace(10.0, 0.0, -2.0, 9);
    println!(
        "{:>10}  {}  {}",
        "eps", "nsd", DIRECT_ORDERS.map(|n| format!("|direct({n}) - nsd|")).join("  "),
    );
    for &eps in epsilons.iter() {
        let (bra, ket) = packets(eps)?;
        let mut nsd = NSDInhomogeneous::new(
            GaussHermite::new(1, NSD_ORDER, Weighting::Gaussian)?, &bra, &ket);
        nsd.prepare();
        let nsd_val = nsd.compute_overlap(0, 0)?;
        let errs: Vec<String>
            = DIRECT_ORDERS.iter()
            .map(|&n| -> anyhow::Result<String> {
                let mut direct = DirectInhomogeneous::new(
                    GaussHermite::new(1, n, Weighting::Scaled)?, &bra, &ket);
                direct.prepare();
                let direct_val = direct.compute_overlap(0, 0)?;
                Ok(format!("{:>18.3e}", (direct_val - nsd_val).norm()))
            })
            .collect::<anyhow::Result<_>>()?;
        println!("{:>10.3e}  {:.6e}  {}", eps, nsd_val, errs.join("  "));
    }
    Ok(())
}
