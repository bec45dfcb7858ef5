//! 时间缓动
//!
//! 作用于段内插值参数的缓动函数。只缓动变换插值，
//! 可见性切换始终使用未缓动的参数。

/// 缓动函数
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// 线性，不缓动
    #[default]
    Linear,
    /// smoothstep 3t²-2t³，段首尾速度为零
    SmoothStep,
}

impl Easing {
    /// 求值，输入输出都限制在 [0,1]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_identity() {
        assert_eq!(Easing::Linear.apply(0.25), 0.25);
        assert_eq!(Easing::Linear.apply(0.0), 0.0);
        assert_eq!(Easing::Linear.apply(1.0), 1.0);
    }

    #[test]
    fn test_smoothstep_endpoints_exact() {
        assert_eq!(Easing::SmoothStep.apply(0.0), 0.0);
        assert_eq!(Easing::SmoothStep.apply(1.0), 1.0);
        assert!((Easing::SmoothStep.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_clamped() {
        assert_eq!(Easing::SmoothStep.apply(-1.0), 0.0);
        assert_eq!(Easing::SmoothStep.apply(2.0), 1.0);
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
    }
}
