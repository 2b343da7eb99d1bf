pub mod dense_net;
pub mod predictor;
