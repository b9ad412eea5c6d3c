//! 機械学習機能を提供するモジュール
//!
//! 学習ループ、モデル、トークナイザは外部の学習フレームワークに任せ、
//! このモジュールは評価指標のみを提供します。

pub mod metrics;
