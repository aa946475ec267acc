//! Action-value function on `concat(state, goal)`.
use crate::{
    mlp::{Mlp, MlpConfig},
    opt::{Optimizer, OptimizerConfig},
    util::{bits_to_tensor, copy_varmap},
    Device,
};
use anyhow::Result;
use bitflip_core::{error::BitFlipError, Bits, TdBatch, ValueFunction};
use candle_core::{DType, Tensor, D};
use candle_nn::{loss::mse, VarBuilder, VarMap};
use log::{info, trace};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`QNet`].
pub struct QNetConfig {
    /// Network mapping `concat(state, goal)` to one value per action.
    pub mlp_config: MlpConfig,

    /// Optimizer of the network parameters.
    pub opt_config: OptimizerConfig,

    /// Device on which the network lives.
    #[serde(default)]
    pub device: Device,
}

impl QNetConfig {
    /// A network for `num_bits` bits: `2 * num_bits` inputs, a hidden layer of
    /// 256 ReLU units and `num_bits` outputs, trained with Adam.
    pub fn new(num_bits: usize) -> Self {
        Self {
            mlp_config: MlpConfig::new(2 * num_bits, vec![256], num_bits),
            opt_config: OptimizerConfig::default(),
            device: Device::Cpu,
        }
    }

    /// Sets the sizes of the hidden layers.
    pub fn hidden_units(mut self, units: Vec<usize>) -> Self {
        self.mlp_config = MlpConfig::new(
            self.mlp_config.in_dim(),
            units,
            self.mlp_config.out_dim(),
        );
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Sets the device.
    pub fn device(mut self, v: Device) -> Self {
        self.device = v;
        self
    }

    /// Constructs [`QNetConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`QNetConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Action-value function `Q(s, g)` as an MLP with its own optimizer.
///
/// Parameters are held in a [`VarMap`]; [`ValueFunction::copy_from`] copies
/// them by name, so the target network never shares storage with the
/// online one.
pub struct QNet {
    device: candle_core::Device,
    varmap: VarMap,
    mlp: Mlp,
    opt: Optimizer,
}

impl QNet {
    /// Returns the parameters.
    pub fn varmap(&self) -> &VarMap {
        &self.varmap
    }

    /// Saves the parameters in safetensors format.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.varmap.save(&path)?;
        info!("Save qnet to {:?}", path.as_ref());
        Ok(())
    }

    /// Loads parameters saved with [`QNet::save`].
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.varmap.load(&path)?;
        info!("Load qnet from {:?}", path.as_ref());
        Ok(())
    }

    fn forward(&self, states: &[Bits], goals: &[Bits]) -> Result<Tensor> {
        let xs = bits_to_tensor(states, goals, &self.device)?;
        self.mlp.forward(&xs)
    }
}

impl ValueFunction for QNet {
    type Config = QNetConfig;

    fn build(config: &Self::Config) -> Result<Self> {
        let device = config.device.open()?;
        let varmap = VarMap::new();
        let mlp = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            Mlp::build(vb, config.mlp_config.clone())?
        };
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            device,
            varmap,
            mlp,
            opt,
        })
    }

    fn n_actions(&self) -> usize {
        self.mlp.config().out_dim()
    }

    fn predict(&self, states: &[Bits], goals: &[Bits]) -> Result<Array2<f32>> {
        let q = self.forward(states, goals)?;
        let data = q.flatten_all()?.to_vec1::<f32>()?;
        Ok(Array2::from_shape_vec((states.len(), self.n_actions()), data)?)
    }

    fn train_step(&mut self, batch: &TdBatch) -> Result<f32> {
        let n = batch.len();
        let n_actions = self.n_actions();
        if let Some(&a) = batch.actions.iter().find(|&&a| a >= n_actions) {
            return Err(BitFlipError::InvalidAction {
                action: a,
                num_actions: n_actions,
            }
            .into());
        }

        let act: Vec<u32> = batch.actions.iter().map(|&a| a as u32).collect();
        let act = Tensor::from_vec(act, (n, 1), &self.device)?;
        let tgt = Tensor::from_slice(batch.targets, (n,), &self.device)?;
        let pred = self
            .forward(batch.states, batch.goals)?
            .gather(&act, D::Minus1)?
            .squeeze(D::Minus1)?;

        let loss = mse(&pred, &tgt)?;
        let loss_value = loss.to_scalar::<f32>()?;
        self.opt.backward_step(&loss)?;
        trace!("train_step: n = {}, loss = {}", n, loss_value);

        Ok(loss_value)
    }

    fn copy_from(&mut self, src: &Self) -> Result<()> {
        copy_varmap(&self.varmap, &src.varmap)
    }
}
