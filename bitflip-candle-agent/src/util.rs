//! Utilities.
use anyhow::{anyhow, bail, Context, Result};
use bitflip_core::Bits;
use candle_core::{Device, Tensor};
use candle_nn::VarMap;
use log::trace;

/// Overwrites every variable of `dest` with the variable of the same name in `src`.
///
/// Both maps must hold the same set of names and shapes, as two networks
/// built from the same configuration do.
pub fn copy_varmap(dest: &VarMap, src: &VarMap) -> Result<()> {
    let dest = dest.data().lock().map_err(|e| anyhow!("{}", e))?;
    let src = src.data().lock().map_err(|e| anyhow!("{}", e))?;

    if dest.len() != src.len() {
        bail!(
            "variable maps differ in size: {} and {}",
            dest.len(),
            src.len()
        );
    }
    trace!("Copy {} variables", src.len());
    for (k, v_dest) in dest.iter() {
        let v_src = src
            .get(k)
            .with_context(|| format!("variable {} not found in source", k))?;
        v_dest.set(v_src.as_tensor())?;
    }

    Ok(())
}

/// Stacks `concat(state, goal)` of every pair into an `f32` tensor of shape
/// `(n, 2 * num_bits)`.
pub fn bits_to_tensor(states: &[Bits], goals: &[Bits], device: &Device) -> Result<Tensor> {
    if states.len() != goals.len() {
        bail!("{} states but {} goals", states.len(), goals.len());
    }
    let num_bits = match states.first() {
        Some(s) => s.len(),
        None => bail!("empty batch"),
    };

    let n = states.len();
    let mut data = Vec::with_capacity(n * 2 * num_bits);
    for (s, g) in states.iter().zip(goals.iter()) {
        if s.len() != num_bits || g.len() != num_bits {
            bail!(
                "expected {} bits, got a state of {} and a goal of {}",
                num_bits,
                s.len(),
                g.len()
            );
        }
        data.extend(s.iter().chain(g.iter()).map(|&b| b as f32));
    }

    Ok(Tensor::from_vec(data, (n, 2 * num_bits), device)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::DType;
    use candle_nn::Init;

    #[test]
    fn test_bits_to_tensor() -> Result<()> {
        let states = vec![vec![1, 0], vec![0, 0]];
        let goals = vec![vec![1, 1], vec![0, 1]];
        let t = bits_to_tensor(&states, &goals, &Device::Cpu)?;
        assert_eq!(
            t.to_vec2::<f32>()?,
            vec![vec![1.0, 0.0, 1.0, 1.0], vec![0.0, 0.0, 0.0, 1.0]]
        );
        Ok(())
    }

    #[test]
    fn test_bits_to_tensor_rejects_ragged_batch() {
        let states = vec![vec![1, 0], vec![0]];
        let goals = vec![vec![1, 1], vec![0, 1]];
        assert!(bits_to_tensor(&states, &goals, &Device::Cpu).is_err());
        assert!(bits_to_tensor(&[], &[], &Device::Cpu).is_err());
    }

    #[test]
    fn test_copy_varmap() -> Result<()> {
        let init = Init::Randn {
            mean: 0.0,
            stdev: 1.0,
        };
        let vm_src = VarMap::new();
        vm_src.get((3,), "var1", init, DType::F32, &Device::Cpu)?;
        let vm_dest = VarMap::new();
        vm_dest.get((3,), "var1", init, DType::F32, &Device::Cpu)?;

        copy_varmap(&vm_dest, &vm_src)?;
        let t_src = vm_src.all_vars()[0].as_tensor().to_vec1::<f32>()?;
        let t_dest = vm_dest.all_vars()[0].as_tensor().to_vec1::<f32>()?;
        assert_eq!(t_src, t_dest);

        // The copy does not alias the source
        vm_src.all_vars()[0].set(&Tensor::zeros((3,), DType::F32, &Device::Cpu)?)?;
        let t_dest_ = vm_dest.all_vars()[0].as_tensor().to_vec1::<f32>()?;
        assert_eq!(t_dest, t_dest_);
        Ok(())
    }

    #[test]
    fn test_copy_varmap_rejects_size_mismatch() -> Result<()> {
        let init = Init::Const(1.0);
        let vm_src = VarMap::new();
        vm_src.get((2,), "var1", init, DType::F32, &Device::Cpu)?;
        vm_src.get((2,), "var2", init, DType::F32, &Device::Cpu)?;
        let vm_dest = VarMap::new();
        vm_dest.get((2,), "var1", Init::Const(0.0), DType::F32, &Device::Cpu)?;

        assert!(copy_varmap(&vm_dest, &vm_src).is_err());
        let t_dest = vm_dest.all_vars()[0].as_tensor().to_vec1::<f32>()?;
        assert_eq!(t_dest, vec![0.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_copy_varmap_rejects_missing_variable() -> Result<()> {
        let init = Init::Const(0.0);
        let vm_src = VarMap::new();
        vm_src.get((3,), "var1", init, DType::F32, &Device::Cpu)?;
        let vm_dest = VarMap::new();
        vm_dest.get((3,), "var2", init, DType::F32, &Device::Cpu)?;
        assert!(copy_varmap(&vm_dest, &vm_src).is_err());
        Ok(())
    }
}
