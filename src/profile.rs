use tracing::info;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Profile {
    pub bounce_rays: usize, // all rays that bounce
    pub shadow_rays: usize, // all rays used to test visibility
    pub light_rays: usize,  // all rays leaving a light
    pub camera_rays: usize, // all rays leaving the camera
    pub escaped: usize,     // rays that left the scene
}

impl Profile {
    pub fn new(
        bounce_rays: usize,
        shadow_rays: usize,
        light_rays: usize,
        camera_rays: usize,
        escaped: usize,
    ) -> Self {
        Profile {
            bounce_rays,
            shadow_rays,
            light_rays,
            camera_rays,
            escaped,
        }
    }

    pub fn combine(&self, other: Self) -> Self {
        Profile::new(
            self.bounce_rays + other.bounce_rays,
            self.shadow_rays + other.shadow_rays,
            self.light_rays + other.light_rays,
            self.camera_rays + other.camera_rays,
            self.escaped + other.escaped,
        )
    }

    pub fn total_rays(&self) -> usize {
        self.bounce_rays + self.shadow_rays + self.light_rays + self.camera_rays
    }

    pub fn pretty_print(&self, elapsed: f32, threads: usize) {
        let threads = threads.max(1) as f32;
        let report = |what: &str, count: usize| {
            info!(
                "{} total {} at {} per second and {} per second per thread",
                count,
                what,
                count as f32 / elapsed,
                count as f32 / elapsed / threads
            );
        };
        report("bounce rays", self.bounce_rays);
        report("shadow/visibility rays", self.shadow_rays);
        report("light rays", self.light_rays);
        report("camera rays", self.camera_rays);
        info!("{} rays escaped the scene", self.escaped);
        report("rays", self.total_rays());
    }
}
