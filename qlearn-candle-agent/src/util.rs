//! Utilities.
use anyhow::{anyhow, Context, Result};
use candle_core::Tensor;
use candle_nn::VarMap;
use log::trace;
use serde::{Deserialize, Serialize};

/// Critic loss type.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum CriticLoss {
    /// Mean squared error.
    Mse,

    /// Smooth L1 loss.
    #[default]
    SmoothL1,
}

/// Interface for handling output dimensions.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> usize;

    /// Sets the  output dimension.
    fn set_out_dim(&mut self, v: usize);
}

/// Interface for handling input dimensions.
pub trait InDim {
    /// Returns the input dimension.
    fn get_in_dim(&self) -> usize;

    /// Sets the input dimension.
    fn set_in_dim(&mut self, v: usize);
}

/// Apply soft update on variables.
///
/// Variables are identified by their names.
///
/// dest = tau * src + (1.0 - tau) * dest
pub fn track(dest: &VarMap, src: &VarMap, tau: f64) -> Result<()> {
    trace!("track with tau = {}", tau);
    let dest = dest
        .data()
        .lock()
        .map_err(|_| anyhow!("failed to lock the destination VarMap"))?;
    let src = src
        .data()
        .lock()
        .map_err(|_| anyhow!("failed to lock the source VarMap"))?;

    for (k_dest, v_dest) in dest.iter() {
        let v_src = src
            .get(k_dest)
            .with_context(|| format!("{} is not in the source VarMap", k_dest))?;
        let t_src = v_src.as_tensor();
        let t_dest = v_dest.as_tensor();
        let t_dest = ((tau * t_src)? + ((1.0 - tau) * t_dest)?)?;
        v_dest.set(&t_dest)?;
    }

    Ok(())
}

/// Copies variables from `src` to `dest`.
///
/// Variables are identified by their names. The values in `dest` are
/// bit-identical to those in `src` after the copy.
pub fn copy_params(dest: &VarMap, src: &VarMap) -> Result<()> {
    trace!("copy_params");
    let dest = dest
        .data()
        .lock()
        .map_err(|_| anyhow!("failed to lock the destination VarMap"))?;
    let src = src
        .data()
        .lock()
        .map_err(|_| anyhow!("failed to lock the source VarMap"))?;

    for (k_dest, v_dest) in dest.iter() {
        let v_src = src
            .get(k_dest)
            .with_context(|| format!("{} is not in the source VarMap", k_dest))?;
        v_dest.set(v_src.as_tensor())?;
    }

    Ok(())
}

/// See <https://pytorch.org/docs/stable/generated/torch.nn.SmoothL1Loss.html>.
///
/// `beta` is fixed to 1 and the loss is averaged over all elements.
pub fn smooth_l1_loss(x: &Tensor, y: &Tensor) -> Result<Tensor, candle_core::Error> {
    let d = (x - y)?.abs()?;
    let m1 = d.lt(1.0)?.to_dtype(d.dtype())?;
    let m2 = m1.affine(-1.0, 1.0)?;
    let quadratic = (d.sqr()? * 0.5)?;
    let linear = d.affine(1.0, -0.5)?;
    ((m1 * quadratic)? + (m2 * linear)?)?.mean_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device, Var};
    use candle_nn::Init;

    fn varmap_with(values: &[f32]) -> Result<VarMap> {
        let vm = VarMap::new();
        let init = Init::Randn {
            mean: 0.0,
            stdev: 1.0,
        };
        vm.get((values.len(),), "var1", init, DType::F32, &Device::Cpu)?;
        let t = Tensor::from_slice(values, (values.len(),), &Device::Cpu)?;
        get_var(&vm)?.set(&t)?;
        Ok(vm)
    }

    fn get_var(vm: &VarMap) -> Result<Var> {
        let data = vm.data().lock().map_err(|_| anyhow!("lock"))?;
        Ok(data.get("var1").context("var1")?.clone())
    }

    #[test]
    fn test_track() -> Result<()> {
        let tau = 0.7;
        let vm_src = varmap_with(&[1.0, 2.0, 3.0])?;
        let vm_dest = varmap_with(&[4.0, 5.0, 6.0])?;
        track(&vm_dest, &vm_src, tau)?;

        let t = get_var(&vm_dest)?.as_tensor().to_vec1::<f32>()?;
        let expected = [1.9f32, 2.9, 3.9];
        for (v, e) in t.iter().zip(expected.iter()) {
            assert!((v - e).abs() < 1e-6);
        }
        Ok(())
    }

    #[test]
    fn test_copy_params() -> Result<()> {
        let vm_src = varmap_with(&[1.0, 2.0, 3.0])?;
        let vm_dest = varmap_with(&[4.0, 5.0, 6.0])?;
        copy_params(&vm_dest, &vm_src)?;

        let t = get_var(&vm_dest)?.as_tensor().to_vec1::<f32>()?;
        assert_eq!(t, vec![1.0, 2.0, 3.0]);

        // the copy does not share storage with the source
        get_var(&vm_src)?.set(&Tensor::from_slice(&[7f32, 8.0, 9.0], (3,), &Device::Cpu)?)?;
        let t = get_var(&vm_dest)?.as_tensor().to_vec1::<f32>()?;
        assert_eq!(t, vec![1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_smooth_l1_loss() -> Result<()> {
        let x = Tensor::from_slice(&[0f32, 0.0, 0.0], (3,), &Device::Cpu)?;
        let y = Tensor::from_slice(&[0.5f32, 2.0, -3.0], (3,), &Device::Cpu)?;
        let loss = smooth_l1_loss(&x, &y)?.to_scalar::<f32>()?;
        // (0.125 + 1.5 + 2.5) / 3
        assert!((loss - 1.375).abs() < 1e-6);
        Ok(())
    }
}
